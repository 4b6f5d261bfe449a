use shared_notifications::OutgoingEmail;

use crate::models::Booking;

const CONTACT_LINE: &str = "Any issues, contact us: +880123456789";

/// Renders the confirmation sent to the patient after a new booking.
pub fn confirmation_email(booking: &Booking) -> OutgoingEmail {
    let date = booking.date.format("%Y-%m-%d").to_string();
    let summary = format!(
        "Your Appointment for {} is booked on {} at {}",
        booking.treatment, date, booking.slot
    );

    let html = format!(
        "<h2>Hello {patient}</h2>\
         <p>You have received this email for booking a slot for {treatment}.</p>\
         <p>The booking is fixed on {date} at {slot}</p>\
         <p>We are delighted to provide you with our treatment service. Hope to see you soon.</p>\
         <p>{contact}</p>",
        patient = escape_html(&booking.patient),
        treatment = escape_html(&booking.treatment),
        date = date,
        slot = escape_html(&booking.slot),
        contact = CONTACT_LINE,
    );

    OutgoingEmail {
        to: booking.patient_email.clone(),
        subject: summary.clone(),
        text: summary,
        html,
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
