use karl_curl::{FetchConfig, Request, Session};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let url = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: fetch <url>"))?;

    let cfg = FetchConfig::builder()
        .max_body_size(16 * 1024 * 1024)
        .build()?;
    let session = Session::new(cfg)?;

    // Ctrl-C stops the transfer at the next chunk
    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let res = session.fetch(Request::get(url).ascii_result(true), cancel).await?;

    println!("{} {} ({})", res.status, res.status_text, res.url);
    println!("{} bytes, buffer capacity {}", res.body.len(), res.body.capacity());
    match res.ascii {
        Some(text) => println!("{text}"),
        None => println!("<binary body>"),
    }
    Ok(())
}
