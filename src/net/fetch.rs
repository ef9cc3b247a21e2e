use crate::config::FetchConfig;
use crate::errors::FetchError;
use crate::net::response::to_ascii;
use crate::net::{Request, Response};
use crate::sink::ResponseSink;
use http::header::LOCATION;
use http::{HeaderMap, Method, StatusCode};
use tokio_util::sync::CancellationToken;
use url::Url;

fn new_sink(config: &FetchConfig) -> Result<ResponseSink, FetchError> {
    let sink = match config.max_body_size {
        Some(limit) => ResponseSink::with_limit(config.initial_capacity, limit)?,
        None => ResponseSink::new(config.initial_capacity)?,
    };
    Ok(sink)
}

async fn send(
    client: &reqwest::Client,
    method: &Method,
    url: &Url,
    headers: &HeaderMap,
    body: Option<&[u8]>,
    cancel: &CancellationToken,
) -> Result<reqwest::Response, FetchError> {
    let mut builder = client.request(method.clone(), url.clone()).headers(headers.clone());
    if let Some(body) = body {
        builder = builder.body(body.to_vec());
    }

    log::info!("{} {}", method, url);

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(FetchError::Canceled),
        r = builder.send() => Ok(r?),
    }
}

/// Where a redirect response points to, if it should be followed. The
/// method and body are kept on every hop, POST included.
fn redirect_target(config: &FetchConfig, res: &reqwest::Response) -> Result<Option<Url>, FetchError> {
    if !config.follow_redirects {
        return Ok(None);
    }
    match res.status() {
        StatusCode::MOVED_PERMANENTLY
        | StatusCode::FOUND
        | StatusCode::SEE_OTHER
        | StatusCode::TEMPORARY_REDIRECT
        | StatusCode::PERMANENT_REDIRECT => {}
        _ => return Ok(None),
    }
    let Some(location) = res.headers().get(LOCATION) else {
        return Ok(None);
    };

    let location = location
        .to_str()
        .map_err(|_| FetchError::InvalidHeader(format!("location: {:?}", location)))?;
    let next = res.url().join(location)?;
    match next.scheme() {
        "https" => {}
        "http" if !config.https_only => {}
        other => return Err(FetchError::UnsupportedScheme(other.to_string())),
    }
    Ok(Some(next))
}

// Sends the request, follows redirects and streams the final body into a
// response sink.
pub(crate) async fn fetch(
    client: &reqwest::Client,
    config: &FetchConfig,
    mut request: Request,
    cancel: CancellationToken,
) -> Result<Response, FetchError> {
    let mut url = request.resolve_url(config.https_only)?;
    let headers = request.header_map()?;
    let wants_ascii = request.wants_ascii();
    let method = request.method();
    let body = request.take_body();

    let mut hops = 0;
    let mut res = loop {
        let res = send(client, &method, &url, &headers, body.as_deref(), &cancel).await?;
        let Some(next) = redirect_target(config, &res)? else {
            break res;
        };

        hops += 1;
        if hops > config.max_redirects {
            return Err(FetchError::TooManyRedirects(config.max_redirects));
        }
        log::debug!("{} {} redirected ({}) to {}", method, url, res.status().as_u16(), next);
        url = next;
    };

    let final_url = res.url().clone();
    let status = res.status().as_u16();
    let status_text = res.status().canonical_reason().unwrap_or("Unknown").to_string();
    let headers = res.headers().clone();

    let mut sink = new_sink(config)?;

    // Pull chunks until the body ends or a chunk is refused. `finish` runs
    // exactly once afterwards, whatever the outcome.
    let outcome: Result<(), FetchError> = loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            c = res.chunk() => Some(c),
        };
        let Some(chunk) = chunk else {
            break Err(FetchError::Canceled);
        };

        match chunk {
            Ok(Some(bytes)) => match sink.on_chunk(&bytes) {
                Ok(n) if n == bytes.len() => {}
                // Refused; the failure travels out through `finish`
                Ok(_) => break Ok(()),
                Err(e) => break Err(e.into()),
            },
            Ok(None) => break Ok(()),
            Err(e) => break Err(e.into()),
        }
    };

    let completed = sink.finish(status)?;
    outcome?;
    if let Some(failure) = completed.failure {
        return Err(FetchError::Aborted(failure));
    }

    log::info!("{} {} -> {} ({} bytes)", method, final_url, status, completed.body.len());

    let ascii = if wants_ascii {
        to_ascii(completed.body.as_bytes())
    } else {
        None
    };

    Ok(Response {
        url: final_url,
        status: completed.status,
        status_text,
        headers,
        body: completed.body,
        ascii,
    })
}
