//! Appointment event templates and hosted-widget prefill links.

use closer_core::types::RecordId;
use url::Url;

/// Event title for a booked appointment.
pub fn event_summary(lead_name: &str) -> String {
    format!("Appuntamento Closer - {lead_name}")
}

/// Event description embedding the lead's contact data and, when known, the
/// address and property record id.
pub fn event_description(
    lead_name: &str,
    lead_phone: &str,
    lead_address: Option<&str>,
    property_id: Option<RecordId>,
) -> String {
    let mut description = format!("Lead: {lead_name}\nTelefono: {lead_phone}");
    if let Some(address) = lead_address {
        description.push_str(&format!("\nIndirizzo: {address}"));
    }
    if let Some(id) = property_id {
        description.push_str(&format!("\nID Proprietà: {id}"));
    }
    description
}

/// Build the hosted scheduling page URL with prefill parameters.
///
/// The widget accepts `name`, a `first_name`/`last_name` split when the name
/// has more than one word, a `location`, and the phone number as the first
/// custom answer (`a1`).
pub fn scheduler_prefill_url(
    base_url: &str,
    lead_name: &str,
    lead_phone: &str,
    lead_address: Option<&str>,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base_url)?;

    {
        let mut params = url.query_pairs_mut();

        let name = lead_name.trim();
        if !name.is_empty() {
            params.append_pair("name", name);
            let mut parts = name.split_whitespace();
            if let (Some(first), rest) = (parts.next(), parts.collect::<Vec<_>>()) {
                if !rest.is_empty() {
                    params.append_pair("first_name", first);
                    params.append_pair("last_name", &rest.join(" "));
                }
            }
        }

        if let Some(address) = lead_address {
            params.append_pair("location", address);
        }

        if !lead_phone.is_empty() {
            params.append_pair("a1", lead_phone);
        }
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn summary_embeds_the_lead_name() {
        assert_eq!(
            event_summary("Mario Rossi"),
            "Appuntamento Closer - Mario Rossi"
        );
    }

    #[test]
    fn description_with_all_fields() {
        let id = Uuid::nil();
        let description = event_description(
            "Mario Rossi",
            "+39 333 1234567",
            Some("Via Roma 12, Milano"),
            Some(id),
        );
        assert_eq!(
            description,
            format!(
                "Lead: Mario Rossi\nTelefono: +39 333 1234567\nIndirizzo: Via Roma 12, Milano\nID Proprietà: {id}"
            )
        );
    }

    #[test]
    fn description_without_optional_fields() {
        let description = event_description("Anna Bianchi", "333", None, None);
        assert_eq!(description, "Lead: Anna Bianchi\nTelefono: 333");
    }

    #[test]
    fn prefill_url_splits_multi_word_names() {
        let url = scheduler_prefill_url(
            "https://calendly.com/closer/sopralluogo",
            "Mario De Luca",
            "+39 333 1234567",
            Some("Via Roma 12"),
        )
        .unwrap();

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("name".to_string(), "Mario De Luca".to_string())));
        assert!(pairs.contains(&("first_name".to_string(), "Mario".to_string())));
        assert!(pairs.contains(&("last_name".to_string(), "De Luca".to_string())));
        assert!(pairs.contains(&("location".to_string(), "Via Roma 12".to_string())));
        assert!(pairs.contains(&("a1".to_string(), "+39 333 1234567".to_string())));
    }

    #[test]
    fn single_word_name_has_no_split() {
        let url = scheduler_prefill_url("https://calendly.com/closer/preliminare", "Mario", "", None)
            .unwrap();

        let keys: Vec<String> = url.query_pairs().map(|(k, _)| k.into_owned()).collect();
        assert_eq!(keys, vec!["name"]);
    }

    #[test]
    fn invalid_base_url_is_an_error() {
        assert!(scheduler_prefill_url("not a url", "Mario", "333", None).is_err());
    }
}
