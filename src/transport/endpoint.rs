use url::Url;

use crate::domain::{ApiHost, ApiToken};

/// Build an authenticated request URL: `<host>/<endpoint>?token=<token>&<params>`.
///
/// A trailing slash on the host is dropped; the endpoint path is kept as-is, so
/// endpoints such as `credit/` keep their trailing slash.
pub fn make_url(
    host: &ApiHost,
    token: &ApiToken,
    endpoint: &str,
    params: &[(String, String)],
) -> Result<Url, url::ParseError> {
    let host = host.as_str().strip_suffix('/').unwrap_or(host.as_str());
    let endpoint = endpoint.trim_start_matches('/');
    let mut url = Url::parse(&format!("{host}/{endpoint}"))?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair(ApiToken::FIELD, token.as_str());
        for (key, value) in params {
            query.append_pair(key, value);
        }
    }
    Ok(url)
}

/// Join values into the comma-separated form MIMO expects for multi-value parameters.
pub fn join_values<I, T>(values: I) -> String
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    values
        .into_iter()
        .map(|value| value.as_ref().to_owned())
        .collect::<Vec<_>>()
        .join(",")
}
