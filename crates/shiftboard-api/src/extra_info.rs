//! HTML fragment shown when hovering a resource in the scheduler.
//!
//! `resource_details` values are free text, so every interpolated value goes
//! through ammonia before it is embedded in markup.

use shiftboard_core::ResourceDetails;

pub const NO_EXTRA_INFO: &str = "<div>No extra info for this resource</div>";

pub fn render_extra_info(details: &ResourceDetails) -> String {
    let job_title = sanitize_text(details.job_title.as_deref());
    let years_experience = number(details.years_experience);
    let years_with_company = number(details.years_with_company);
    let age = number(details.age);
    let gender = sanitize_text(details.gender.as_deref());
    let additional_info = sanitize_text(details.additional_info.as_deref());

    format!(
        r#"<div class="extraInfo">
  <h3>Extra Info</h3>
  <ul>
    <li><b>Job Title</b>: {job_title}</li>
    <li><b>Years Experience:</b> {years_experience}</li>
    <li><b>Years With Company:</b> {years_with_company}</li>
    <li><b>Age:</b> {age}</li>
    <li><b>Gender:</b> {gender}</li>
    <li><b>Additional Info:</b> {additional_info}</li>
  </ul>
</div>"#
    )
}

/// Strip scripts, event handlers and unsafe URLs; escape the rest
fn sanitize_text(value: Option<&str>) -> String {
    value.map(ammonia::clean).unwrap_or_default()
}

fn number(value: Option<i64>) -> String {
    value.map(|n| n.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> ResourceDetails {
        ResourceDetails {
            job_title: Some("Site Manager".to_string()),
            years_experience: Some(12),
            years_with_company: Some(4),
            age: Some(38),
            gender: Some("Male".to_string()),
            additional_info: Some("Speaks <i>three</i> languages".to_string()),
        }
    }

    #[test]
    fn renders_every_field() {
        let html = render_extra_info(&details());
        assert!(html.starts_with(r#"<div class="extraInfo">"#));
        assert!(html.contains("<li><b>Job Title</b>: Site Manager</li>"));
        assert!(html.contains("<li><b>Years Experience:</b> 12</li>"));
        assert!(html.contains("<li><b>Years With Company:</b> 4</li>"));
        assert!(html.contains("<li><b>Age:</b> 38</li>"));
        assert!(html.contains("<li><b>Gender:</b> Male</li>"));
        assert!(html.contains("Speaks <i>three</i> languages"));
    }

    #[test]
    fn strips_script_payloads() {
        let html = render_extra_info(&ResourceDetails {
            additional_info: Some("<script>alert('pwned')</script>Team lead".to_string()),
            ..details()
        });
        assert!(!html.contains("<script"));
        assert!(!html.contains("alert"));
        assert!(!html.contains("pwned"));
        assert!(html.contains("Team lead"));
    }

    #[test]
    fn strips_event_handlers_and_javascript_urls() {
        let html = render_extra_info(&ResourceDetails {
            job_title: Some(r#"<img src="x.png" onerror="steal()">Chef"#.to_string()),
            gender: Some(r#"<a href="javascript:steal()">link</a>"#.to_string()),
            ..details()
        });
        assert!(!html.contains("onerror"));
        assert!(!html.contains("steal"));
        assert!(html.contains("Chef"));
    }

    #[test]
    fn escapes_stray_angle_brackets() {
        let html = render_extra_info(&ResourceDetails {
            additional_info: Some("budget < 5k".to_string()),
            ..details()
        });
        assert!(html.contains("budget &lt; 5k"));
    }

    #[test]
    fn missing_values_render_empty() {
        let html = render_extra_info(&ResourceDetails::default());
        assert!(html.contains("<li><b>Age:</b> </li>"));
        assert!(html.contains("<li><b>Job Title</b>: </li>"));
    }
}
