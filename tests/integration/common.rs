use finish_times::category::Sex;
use finish_times::config::Config;
use std::path::Path;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

pub const HTML_UTF8: &str = "text/html; charset=UTF-8";

/// Builds a results listing page in the markup of the real site
///
/// With `last_page` set, the page carries a pagination block whose "End" link
/// points at that page.
pub fn results_page(times: &[&str], last_page: Option<u32>) -> String {
    let rows: String = times
        .iter()
        .enumerate()
        .map(|(place, time)| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>Runner {}</td><td>1990</td><td>BLR</td>\
                 <td>Minsk</td><td>-</td><td>-</td><td>-</td><td>{}</td></tr>",
                place + 1,
                100 + place,
                place,
                time
            )
        })
        .collect();

    let navigation = match last_page {
        Some(last) => format!(
            r#"<font class="text">Найдено участников</font>
            <font class="text">Страницы: <b>1</b>
              <a href="/results/?year=2019&amp;PAGEN_1=2">2</a>
              <a href="/results/?year=2019&amp;PAGEN_1=2">След.</a>&nbsp;
              <a href="/results/?year=2019&amp;PAGEN_1={}">Конец</a>
            </font>"#,
            last
        ),
        None => String::new(),
    };

    format!(
        r#"<html><head><meta charset="utf-8"><title>Результаты</title></head><body>
        <div class="results">
          {}
          <div id="members">
            <table>
              <thead><tr><th>Место</th><th>Номер</th><th>Участник</th></tr></thead>
              <tbody>{}</tbody>
            </table>
          </div>
        </div></body></html>"#,
        navigation, rows
    )
}

/// Config pointing at the mock server, one year and one distance
pub fn test_config(base_url: &str, cache_dir: &Path, sexes: Vec<Sex>) -> Config {
    let mut config = Config::default();
    config.http.base_url = format!("{}/results/", base_url);
    config.http.user_agent = "finish-times-test/1.0".to_string();
    config.http.request_timeout_secs = Some(10);
    config.scrape.years = vec![2019];
    config.scrape.distances = vec![10];
    config.scrape.sexes = sexes;
    config.scrape.workers = 3;
    config.cache.directory = cache_dir.display().to_string();
    config
}

/// Matches search requests for one sex of the 2019 10 km listing
pub fn search_request(sex: &str) -> MockBuilder {
    Mock::given(method("GET"))
        .and(path("/results/"))
        .and(query_param("year", "2019"))
        .and(query_param("distance[0]", "10"))
        .and(query_param("sex[0]", sex))
}

/// Mounts a response for one explicit page number
pub async fn mount_page(server: &MockServer, sex: &str, page: u32, body: String) {
    search_request(sex)
        .and(query_param("PAGEN_1", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, HTML_UTF8))
        .expect(1)
        .mount(server)
        .await;
}

/// Mounts the first-page response (request without a page number)
///
/// Mount this after every explicit page so those take precedence.
pub async fn mount_first_page(server: &MockServer, sex: &str, body: String) {
    search_request(sex)
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, HTML_UTF8))
        .expect(1)
        .mount(server)
        .await;
}
