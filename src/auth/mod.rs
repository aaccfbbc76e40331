mod token;

pub use token::{authorize, extract_bearer_token, extract_token, TOKEN_PARAM};
