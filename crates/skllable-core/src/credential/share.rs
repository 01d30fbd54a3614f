//! Sharing an issued credential.

use chrono::Datelike;
use url::Url;

use super::issue::Credential;

const LINKEDIN_ADD_PROFILE_URL: &str = "https://www.linkedin.com/profile/add";
const ORGANIZATION_NAME: &str = "Skllable";

/// Public page where a credential ID can be checked.
pub fn verification_url(credential: &Credential) -> String {
    format!("https://verify.skllable.com/credential/{}", credential.id())
}

/// LinkedIn "add certification" link for `credential`.
pub fn linkedin_share_url(credential: &Credential) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(LINKEDIN_ADD_PROFILE_URL)?;
    let earned = credential.earned_date();
    url.query_pairs_mut()
        .append_pair("startTask", "CERTIFICATION_NAME")
        .append_pair(
            "name",
            &format!("{ORGANIZATION_NAME} {} - {}", credential.level(), credential.track_title()),
        )
        .append_pair("organizationName", ORGANIZATION_NAME)
        .append_pair("issueYear", &earned.year().to_string())
        .append_pair("issueMonth", &earned.month().to_string())
        .append_pair("certUrl", &verification_url(credential));
    Ok(url)
}
