//! Client for the Stability AI v1 generation API.
//!
//! A call is either text-to-image or image-to-image depending on whether a
//! source image is supplied. The credential travels in an explicit
//! [`Session`]; nothing is cached or persisted between calls.
//!
//! ```no_run
//! # async fn run() -> imagegate::Result<()> {
//! use imagegate::{GatewayConfig, GenerationRequest, Session, StabilityClient};
//!
//! let client = StabilityClient::new(GatewayConfig::from_env())?;
//! let session = Session::new("sk-...");
//! let image = client
//!     .generate(&session, GenerationRequest::generate("A fantasy castle"))
//!     .await?;
//! std::fs::write("castle.png", image.as_bytes()).ok();
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod imaging;
pub mod logger;
pub mod models;
pub mod session;
pub mod stability;

pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use models::{GenerationMode, GenerationRequest, ImageBytes};
pub use session::{Credential, Session};
pub use stability::{ReqwestTransport, StabilityClient, Transport};
