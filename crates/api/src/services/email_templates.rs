//! Fixed email templates.
//!
//! Every template renders a plain-text body and a small HTML variant.
//! User-supplied values are escaped before they land in the HTML.

use chrono::{DateTime, Utc};

use domain::models::notification::{FeedbackNotice, ReservationNotice};

use super::email::EmailMessage;

const BRAND: &str = "Poznej & Hraj";

/// Holder details for a reservation email.
#[derive(Debug, Clone)]
pub struct ReservationDetails<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub event_title: &'a str,
    pub people_count: i32,
    pub reservation_id: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub note: Option<&'a str>,
}

/// Sent to the holder right after a reservation is placed.
pub fn reservation_created(to: &str, notice: &ReservationNotice) -> EmailMessage {
    let deadline = notice
        .expires_at
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|d| d.format("%d.%m.%Y %H:%M UTC").to_string());

    let mut text = format!(
        "Dobrý den {name},\n\n\
         děkujeme za rezervaci na akci \"{title}\" pro {people} {persons}.\n\
         Číslo rezervace: {id}\n",
        name = notice.name,
        title = notice.event_title,
        people = notice.people_count,
        persons = persons(notice.people_count),
        id = notice.reservation_id,
    );
    if let Some(deadline) = &deadline {
        text.push_str(&format!(
            "\nMísta pro vás držíme do {}. Pokud do té doby rezervaci nezaplatíte, \
             uvolníme je pro ostatní.\n",
            deadline
        ));
    }
    text.push_str(&signature());

    let html = wrap_html(
        "Rezervace přijata",
        &format!(
            "<p>Dobrý den {name},</p>\
             <p>děkujeme za rezervaci na akci <strong>{title}</strong> pro {people} {persons}.</p>\
             <p>Číslo rezervace: <code>{id}</code></p>{deadline}",
            name = escape_html(&notice.name),
            title = escape_html(&notice.event_title),
            people = notice.people_count,
            persons = persons(notice.people_count),
            id = escape_html(&notice.reservation_id),
            deadline = deadline
                .map(|d| format!("<p>Místa pro vás držíme do <strong>{}</strong>.</p>", d))
                .unwrap_or_default(),
        ),
    );

    EmailMessage {
        to: to.to_string(),
        to_name: Some(notice.name.clone()),
        reply_to: None,
        subject: format!("Rezervace přijata: {}", notice.event_title),
        body_text: text,
        body_html: Some(html),
    }
}

/// Sent to the holder when an unpaid hold ran out.
pub fn reservation_expired(to: &str, notice: &ReservationNotice) -> EmailMessage {
    let text = format!(
        "Dobrý den {name},\n\n\
         vaše rezervace {id} na akci \"{title}\" nebyla včas zaplacena, \
         a proto vypršela. Místa jsme uvolnili.\n\
         Pokud máte o akci stále zájem, vytvořte prosím novou rezervaci.\n{sig}",
        name = notice.name,
        id = notice.reservation_id,
        title = notice.event_title,
        sig = signature(),
    );

    let html = wrap_html(
        "Rezervace vypršela",
        &format!(
            "<p>Dobrý den {name},</p>\
             <p>vaše rezervace <code>{id}</code> na akci <strong>{title}</strong> nebyla včas \
             zaplacena, a proto vypršela. Místa jsme uvolnili.</p>\
             <p>Pokud máte o akci stále zájem, vytvořte prosím novou rezervaci.</p>",
            name = escape_html(&notice.name),
            id = escape_html(&notice.reservation_id),
            title = escape_html(&notice.event_title),
        ),
    );

    EmailMessage {
        to: to.to_string(),
        to_name: Some(notice.name.clone()),
        reply_to: None,
        subject: format!("Rezervace vypršela: {}", notice.event_title),
        body_text: text,
        body_html: Some(html),
    }
}

/// Sent to the organisers when someone leaves feedback.
pub fn feedback_received(organizer: &str, notice: &FeedbackNotice) -> EmailMessage {
    let photo_line = notice
        .photo_url
        .as_deref()
        .map(|url| format!("\nFotka: {}\n", url))
        .unwrap_or_default();

    let text = format!(
        "Nová zpětná vazba od {name} <{email}>:\n\n{message}\n{photo}",
        name = notice.name,
        email = notice.email,
        message = notice.message,
        photo = photo_line,
    );

    let html = wrap_html(
        "Nová zpětná vazba",
        &format!(
            "<p><strong>{name}</strong> &lt;{email}&gt;</p>\
             <blockquote>{message}</blockquote>{photo}",
            name = escape_html(&notice.name),
            email = escape_html(&notice.email),
            message = escape_html(&notice.message).replace('\n', "<br>"),
            photo = notice
                .photo_url
                .as_deref()
                .map(|url| format!("<p><a href=\"{0}\">{0}</a></p>", escape_html(url)))
                .unwrap_or_default(),
        ),
    );

    EmailMessage {
        to: organizer.to_string(),
        to_name: None,
        reply_to: Some(notice.email.clone()),
        subject: format!("Zpětná vazba: {}", notice.name),
        body_text: text,
        body_html: Some(html),
    }
}

/// Confirmation for the holder, optionally with a payment link.
pub fn reservation_confirmation(
    details: &ReservationDetails<'_>,
    payment_url: Option<&str>,
) -> EmailMessage {
    let mut text = format!(
        "Dobrý den {name},\n\n\
         potvrzujeme vaši rezervaci na akci \"{title}\" pro {people} {persons}.\n",
        name = details.name,
        title = details.event_title,
        people = details.people_count,
        persons = persons(details.people_count),
    );
    if let Some(id) = details.reservation_id {
        text.push_str(&format!("Číslo rezervace: {}\n", id));
    }
    if let Some(url) = payment_url {
        text.push_str(&format!("\nZaplatit můžete zde: {}\n", url));
    }
    text.push_str(&signature());

    let mut inner = format!(
        "<p>Dobrý den {name},</p>\
         <p>potvrzujeme vaši rezervaci na akci <strong>{title}</strong> pro {people} {persons}.</p>",
        name = escape_html(details.name),
        title = escape_html(details.event_title),
        people = details.people_count,
        persons = persons(details.people_count),
    );
    if let Some(id) = details.reservation_id {
        inner.push_str(&format!("<p>Číslo rezervace: <code>{}</code></p>", escape_html(id)));
    }
    if let Some(url) = payment_url {
        inner.push_str(&format!(
            "<p><a href=\"{}\">Zaplatit rezervaci</a></p>",
            escape_html(url)
        ));
    }

    EmailMessage {
        to: details.email.to_string(),
        to_name: Some(details.name.to_string()),
        reply_to: None,
        subject: format!("Potvrzení rezervace: {}", details.event_title),
        body_text: text,
        body_html: Some(wrap_html("Potvrzení rezervace", &inner)),
    }
}

/// Organiser copy of a new reservation request.
pub fn reservation_request(organizer: &str, details: &ReservationDetails<'_>) -> EmailMessage {
    let text = format!(
        "Nová rezervace na akci \"{title}\"\n\n\
         Jméno: {name}\n\
         Email: {email}\n\
         Telefon: {phone}\n\
         Počet osob: {people}\n\
         Poznámka: {note}\n",
        title = details.event_title,
        name = details.name,
        email = details.email,
        phone = details.phone.unwrap_or("-"),
        people = details.people_count,
        note = details.note.unwrap_or("-"),
    );

    let html = wrap_html(
        "Nová rezervace",
        &format!(
            "<p>Akce: <strong>{title}</strong></p>\
             <table>\
             <tr><td>Jméno</td><td>{name}</td></tr>\
             <tr><td>Email</td><td>{email}</td></tr>\
             <tr><td>Telefon</td><td>{phone}</td></tr>\
             <tr><td>Počet osob</td><td>{people}</td></tr>\
             <tr><td>Poznámka</td><td>{note}</td></tr>\
             </table>",
            title = escape_html(details.event_title),
            name = escape_html(details.name),
            email = escape_html(details.email),
            phone = escape_html(details.phone.unwrap_or("-")),
            people = details.people_count,
            note = escape_html(details.note.unwrap_or("-")),
        ),
    );

    EmailMessage {
        to: organizer.to_string(),
        to_name: None,
        reply_to: Some(details.email.to_string()),
        subject: format!("Nová rezervace: {}", details.event_title),
        body_text: text,
        body_html: Some(html),
    }
}

fn persons(count: i32) -> &'static str {
    match count {
        1 => "osobu",
        2..=4 => "osoby",
        _ => "osob",
    }
}

fn signature() -> String {
    format!("\nS pozdravem\ntým {}\n", BRAND)
}

fn wrap_html(heading: &str, inner: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{heading}</title></head>
<body style="font-family: Arial, sans-serif; line-height: 1.5; color: #222; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2 style="margin-top: 0;">{heading}</h2>
    {inner}
    <p style="color: #888; font-size: 12px;">{brand}</p>
</body>
</html>"#,
        heading = heading,
        inner = inner,
        brand = escape_html(BRAND),
    )
}

pub(crate) fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice() -> ReservationNotice {
        ReservationNotice {
            reservation_id: "r-42".to_string(),
            name: "Jana".to_string(),
            event_title: "Deskovky <naživo>".to_string(),
            people_count: 2,
            expires_at: Some(1_767_225_600_000),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">Tom & Jerry's</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_persons_declension() {
        assert_eq!(persons(1), "osobu");
        assert_eq!(persons(3), "osoby");
        assert_eq!(persons(5), "osob");
    }

    #[test]
    fn test_reservation_created_mentions_deadline() {
        let msg = reservation_created("jana@example.com", &notice());
        assert_eq!(msg.to, "jana@example.com");
        assert!(msg.subject.contains("Deskovky"));
        assert!(msg.body_text.contains("r-42"));
        assert!(msg.body_text.contains("01.01.2026 00:00 UTC"));
        let html = msg.body_html.unwrap();
        assert!(html.contains("Deskovky &lt;naživo&gt;"));
        assert!(!html.contains("<naživo>"));
    }

    #[test]
    fn test_reservation_expired() {
        let mut n = notice();
        n.expires_at = None;
        let msg = reservation_expired("jana@example.com", &n);
        assert!(msg.subject.starts_with("Rezervace vypršela"));
        assert!(msg.body_text.contains("vypršela"));
    }

    #[test]
    fn test_feedback_replies_to_author() {
        let notice = FeedbackNotice {
            feedback_id: "f-1".to_string(),
            name: "Petr".to_string(),
            email: "petr@example.com".to_string(),
            message: "Super akce!\nDíky".to_string(),
            photo_url: Some("https://img.example.com/1.jpg".to_string()),
        };
        let msg = feedback_received("info@example.com", &notice);
        assert_eq!(msg.to, "info@example.com");
        assert_eq!(msg.reply_to.as_deref(), Some("petr@example.com"));
        assert!(msg.body_text.contains("https://img.example.com/1.jpg"));
        assert!(msg.body_html.unwrap().contains("Super akce!<br>Díky"));
    }

    #[test]
    fn test_confirmation_with_payment_link() {
        let details = ReservationDetails {
            name: "Jana",
            email: "jana@example.com",
            event_title: "Kvíz",
            people_count: 1,
            reservation_id: Some("r-1"),
            phone: None,
            note: None,
        };
        let msg = reservation_confirmation(&details, Some("https://pay.example.com/s"));
        assert!(msg.body_text.contains("https://pay.example.com/s"));
        assert!(msg.body_text.contains("1 osobu"));

        let without = reservation_confirmation(&details, None);
        assert!(!without.body_text.contains("Zaplatit"));
    }

    #[test]
    fn test_reservation_request_for_organizer() {
        let details = ReservationDetails {
            name: "Jana",
            email: "jana@example.com",
            event_title: "Kvíz",
            people_count: 4,
            reservation_id: None,
            phone: Some("+420 777 000 111"),
            note: None,
        };
        let msg = reservation_request("info@example.com", &details);
        assert_eq!(msg.to, "info@example.com");
        assert_eq!(msg.reply_to.as_deref(), Some("jana@example.com"));
        assert!(msg.body_text.contains("+420 777 000 111"));
        assert!(msg.body_text.contains("Poznámka: -"));
    }
}
