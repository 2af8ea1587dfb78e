//! Return markers carried by checkout success and cancel URLs.
//!
//! The provider sends the browser back to URLs the client built itself. The
//! query string tells the next page load what happened; once acted upon the
//! marker is scrubbed so a reload does not replay it.

use url::Url;

use crate::domain::foundation::{PlanName, ValidationError};

/// `success=true` on the dashboard after a completed payment.
pub const SUCCESS_PARAM: &str = "success";

/// `canceled=true` on the plan page after an abandoned payment.
pub const CANCELED_PARAM: &str = "canceled";

/// Plan the user paid for, used to know when the provider caught up.
pub const UPGRADED_TO_PARAM: &str = "upgraded_to";

const MARKER_PARAMS: [&str; 3] = [SUCCESS_PARAM, CANCELED_PARAM, UPGRADED_TO_PARAM];

/// Marker found in the current URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnMarker {
    Success { expected_plan: Option<PlanName> },
    Canceled,
}

impl ReturnMarker {
    /// Reads the marker from `url`, success taking precedence.
    pub fn detect(url: &Url) -> Option<Self> {
        let mut success = false;
        let mut canceled = false;
        let mut expected_plan = None;

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                SUCCESS_PARAM => success |= value == "true",
                CANCELED_PARAM => canceled |= value == "true",
                UPGRADED_TO_PARAM => expected_plan = PlanName::new(value.into_owned()).ok(),
                _ => {}
            }
        }

        if success {
            Some(ReturnMarker::Success { expected_plan })
        } else if canceled {
            Some(ReturnMarker::Canceled)
        } else {
            None
        }
    }
}

/// Returns true for query keys owned by the checkout round-trip.
pub fn is_marker_param(key: &str) -> bool {
    MARKER_PARAMS.contains(&key)
}

/// Copy of `url` without marker parameters; other parameters and the
/// fragment are kept in order.
pub fn scrub(url: &Url) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_marker_param(key))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut scrubbed = url.clone();
    if kept.is_empty() {
        scrubbed.set_query(None);
    } else {
        scrubbed.query_pairs_mut().clear().extend_pairs(kept.iter());
    }
    scrubbed
}

/// Where the provider sends the browser after a successful payment.
pub fn success_return_url(
    current: &Url,
    dashboard_path: &str,
    tier: &PlanName,
) -> Result<Url, ValidationError> {
    let mut url = same_origin(current, dashboard_path)?;
    url.query_pairs_mut()
        .append_pair(SUCCESS_PARAM, "true")
        .append_pair(UPGRADED_TO_PARAM, tier.as_str());
    Ok(url)
}

/// Where the provider sends the browser when the user backs out.
pub fn cancel_return_url(current: &Url, choose_plan_path: &str) -> Result<Url, ValidationError> {
    let mut url = same_origin(current, choose_plan_path)?;
    url.query_pairs_mut().append_pair(CANCELED_PARAM, "true");
    Ok(url)
}

/// `path` resolved against the origin of `current`, without query or fragment.
pub fn same_origin(current: &Url, path: &str) -> Result<Url, ValidationError> {
    if !path.starts_with('/') {
        return Err(ValidationError::invalid_format("path", "must start with '/'"));
    }
    let mut url = current
        .join(path)
        .map_err(|e| ValidationError::invalid_format("path", e.to_string()))?;
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
