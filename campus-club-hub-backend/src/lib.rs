pub mod accounts;
pub mod csrf_protection;
pub mod entities;
pub mod error;
pub mod ledger;
pub mod migrate;
pub mod password;
pub mod policy;
pub mod registry;
pub mod router;
pub mod routes;
pub mod seed;
pub mod session;
pub mod templates;

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use campus_club_hub_config::Config;
use campus_club_hub_database::{Store, StoreError};
use error::AppError;
use futures_util::{pin_mut, Future};
use headers::HeaderMapExt as _;
use hyper_util::rt::{TokioExecutor, TokioIo};
use tokio::net::TcpListener;
use tokio::select;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::accounts::Accounts;
use crate::entities::Identity;
use crate::ledger::Ledger;
use crate::policy::policy_for;
use crate::registry::Registry;
use crate::session::Session;

/// Everything a request handler needs, injected once at startup. Handlers
/// receive a reference; nothing here is reachable through ambient state.
pub struct AppState {
    pub registry: Registry,
    pub ledger: Ledger,
    pub accounts: Accounts,
}

impl AppState {
    pub fn new(store: Store, config: &Config) -> Self {
        let policy = policy_for(config.policy);
        Self {
            registry: Registry::new(store.clone(), policy),
            ledger: Ledger::new(store.clone()),
            accounts: Accounts::new(store),
        }
    }

    /// Resolves the session's username to a full identity, role included.
    /// `None` when nobody is logged in or the account has since vanished.
    pub async fn current_identity(
        &self,
        session: &Session,
    ) -> Result<Option<Identity>, StoreError> {
        match session.username() {
            Some(username) => self.accounts.identity(username).await,
            None => Ok(None),
        }
    }
}

pub trait ResponseTypedHeaderExt {
    #[must_use]
    fn typed_header<H: headers::Header>(self, header: H) -> Self;
}

impl ResponseTypedHeaderExt for http::response::Builder {
    fn typed_header<H: headers::Header>(mut self, header: H) -> Self {
        if let Some(headers) = self.headers_mut() {
            headers.typed_insert(header);
        }
        self
    }
}

/// Binds the listener and returns the bound address together with the
/// serve future, so callers (tests included) know the port before the
/// loop starts.
pub async fn run_server(
    listen_addr: &str,
    state: Arc<AppState>,
) -> Result<(SocketAddr, impl Future<Output = Result<(), AppError>>), AppError> {
    info!("starting up server...");
    let listener = TcpListener::bind(listen_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(%local_addr, "listening");
    Ok((local_addr, serve(listener, state)))
}

async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<(), AppError> {
    // tell the connections to shut down
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let shutdown_tx = Arc::new(shutdown_tx);

    // wait for the connections to finish shutdown
    let (closed_tx, closed_rx) = watch::channel(());

    #[allow(clippy::redundant_pub_crate)]
    loop {
        select! {
            accept = listener.accept() => {
                let (socket, _remote_addr) = match accept {
                    Ok(accepted) => accepted,
                    Err(accept_error) => {
                        error!("failed to accept connection: {accept_error}");
                        continue;
                    }
                };

                let state = Arc::clone(&state);
                let shutdown_tx = Arc::clone(&shutdown_tx);
                let closed_rx = closed_rx.clone();

                tokio::spawn(async move {
                    let socket = TokioIo::new(socket);

                    let hyper_service =
                        hyper::service::service_fn(move |request: http::Request<hyper::body::Incoming>| {
                            let state = Arc::clone(&state);
                            async move {
                                Ok::<_, Infallible>(router::handle(request, state).await)
                            }
                        });

                    let builder =
                        hyper_util::server::conn::auto::Builder::new(TokioExecutor::new());
                    let connection = builder.serve_connection(socket, hyper_service);
                    pin_mut!(connection);

                    let mut shutting_down = false;
                    loop {
                        select! {
                            connection_result = connection.as_mut() => {
                                if let Err(connection_error) = connection_result {
                                    error!("failed to serve connection: {connection_error:#}");
                                }
                                break; // (gracefully) finished connection
                            }
                            () = shutdown_tx.closed(), if !shutting_down => {
                                shutting_down = true;
                                connection.as_mut().graceful_shutdown();
                            }
                        }
                    }

                    drop(closed_rx);
                });
            }
            () = shutdown_signal() => {
                warn!("shutting down");
                drop(shutdown_rx); // initiate shutdown
                drop(closed_rx);
                closed_tx.closed().await;
                break;
            }
        }
    }

    Ok(())
}

#[allow(clippy::redundant_pub_crate)]
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
