use anyhow::{Context as AnyhowContext, Result};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Bind the upload server.
///
/// The socket is checked after binding, so a hostname is judged by the
/// address it actually resolved to. A refused listener is dropped before it
/// accepts anything.
pub(crate) async fn bind_upload_listener(bind: &str, public: bool) -> Result<TcpListener> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind upload server to {bind}"))?;
    let addr = listener
        .local_addr()
        .context("Bound upload server has no local address")?;
    ensure_loopback_or_public(addr, public)?;
    Ok(listener)
}

fn ensure_loopback_or_public(addr: SocketAddr, public: bool) -> Result<()> {
    if public || addr.ip().is_loopback() {
        return Ok(());
    }
    anyhow::bail!(
        "Refusing to bind to non-loopback address without --public: {addr}. Uploaded payroll extracts would be reachable from the network."
    )
}
