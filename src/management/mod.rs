mod auth;
mod record;
mod ytauth;

pub use auth::TokenManager;
pub use record::RecordStore;
pub use record::StoreError;
pub use ytauth::YtTokenManager;
