pub mod profile;
pub mod registration;
pub mod session;
pub mod social;

pub use profile::get_user;
pub use registration::sign_up;
pub use session::{current_session, sign_in, sign_out};
pub use social::{oauth_sign_in, oauth_url};
