pub mod backend;
pub mod error;
pub mod facade;
pub mod naming;
pub mod native;
pub mod resolver;

pub use backend::Backend;
pub use error::{IcepackError, Result};
pub use facade::Icepack;
pub use naming::{library_file_name, LIB_BASE};
pub use native::NativeBackend;
pub use resolver::{resolve, SearchConfig, LIB_ENV_VAR};
