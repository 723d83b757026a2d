use resp_core::{
    observer_fn, transport::Outcome, Body, Connection, CookieOptions, Response, ResponseCfg,
    Scheme,
};
use tracing::{info, instrument};

#[instrument(skip_all, fields(id = %res.id()))]
fn handle(res: &mut Response) -> Result<(), Box<dyn std::error::Error>> {
    res.set_content_type("text/plain");
    res.set_charset("utf-8");
    res.headers_mut().add("X-Demo", "stream")?;
    res.set_cookie("visited", "1", CookieOptions::new().path("/").max_age(60))?;
    res.set_body(Body::text_stream((1..=3).map(|i| format!("line {}\n", i))));
    Ok(())
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cfg = ResponseCfg::builder()
        .observer(observer_fn(|res| {
            info!(id = %res.id(), status = res.status(), "response finished");
            Ok(())
        }))
        .build();

    let mut res = Response::new(cfg, Scheme::Http);
    handle(&mut res)?;

    let mut conn = Connection::new(tokio::io::stdout());
    let outcome: Outcome = conn.send_and_settle(res).await?;
    info!(?outcome, "done");
    Ok(())
}
