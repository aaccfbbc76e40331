mod http;

pub use http::{
    body_lookup, first_values, get_webhook, post_webhook, query_lookup, RequestLookup, WebhookResponse,
};
