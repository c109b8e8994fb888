pub mod database;
pub mod extract;
pub mod fingerprint;
pub mod info;
pub mod query;
pub mod record;
pub mod util;

pub use database::*;
pub use extract::*;
pub use fingerprint::*;
pub use info::*;
pub use query::*;
pub use record::*;
pub use util::*;
