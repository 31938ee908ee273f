/// HTML bodies for every outbound message.
///
/// Each builder returns (subject, html). Plain-text fallbacks are derived
/// by the mailer via tag stripping.
use chrono::{DateTime, Utc};

const BRAND: &str = "#00b8b8";

fn offer_block() -> &'static str {
    r#"<p><strong>Special Offers for you:</strong></p>
        <img src="cid:offerImage" alt="Dental Experts Offers" style="max-width: 100%; height: auto; border-radius: 8px;">"#
}

fn signature() -> &'static str {
    "<br><br><p>Best Regards,<br><strong>Dental Experts Team</strong></p>"
}

/// Welcome mail sent at signup. Echoes the plaintext password back to the
/// patient — legacy behavior the frontend copy depends on.
pub fn welcome(name: &str, email: &str, password: &str) -> (String, String) {
    let subject = "Welcome to Dental Experts - Your Credentials".to_string();
    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; padding: 20px; color: #333;">
            <h1 style="color: {BRAND};">Welcome, {name}!</h1>
            <p>Thank you for registering with Dental Experts.</p>
            <p>Here are your account details:</p>
            <div style="background: #f9f9f9; padding: 15px; border-radius: 5px; margin: 20px 0;">
                <p><strong>Email:</strong> {email}</p>
                <p><strong>Password:</strong> {password}</p>
            </div>
            <p>Please keep this information safe or change your password after logging in.</p>
            <p>Best regards,<br>Dental Experts Team</p>
        </div>"#
    );
    (subject, html)
}

pub fn appointment_confirmed(
    name: &str,
    doctor: &str,
    date: &DateTime<Utc>,
    phone: &str,
) -> (String, String) {
    let subject = "Appointment Confirmation - Dental Experts".to_string();
    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; color: #333;">
            <h2 style="color: {BRAND};">Appointment Confirmed!</h2>
            <p>Dear {name},</p>
            <p>Your appointment has been successfully booked.</p>
            <div style="background: #f9f9f9; padding: 15px; border-left: 4px solid {BRAND}; margin: 20px 0;">
                <p><strong>Doctor:</strong> {doctor}</p>
                <p><strong>Date &amp; Time:</strong> {date}</p>
                <p><strong>Patient Phone:</strong> {phone}</p>
            </div>
            <p>We look forward to seeing you. If you have any questions, please contact us.</p>
            {offers}
            {signature}
        </div>"#,
        date = date.format("%B %d, %Y at %I:%M %p"),
        offers = offer_block(),
        signature = signature(),
    );
    (subject, html)
}

/// Alert mail to the clinic inbox about a new inquiry.
pub fn contact_admin_alert(
    name: &str,
    email: &str,
    phone: &str,
    message: &str,
) -> (String, String) {
    let subject = format!("New Inquiry from {name}");
    let html = format!(
        r#"<h3>New Contact Request</h3>
        <p><strong>Name:</strong> {name}</p>
        <p><strong>Email:</strong> {email}</p>
        <p><strong>Phone:</strong> {phone}</p>
        <p><strong>Message:</strong> {message}</p>"#
    );
    (subject, html)
}

/// Auto-reply to the patient who sent an inquiry.
pub fn contact_auto_reply(name: &str, phone: &str) -> (String, String) {
    let subject = "Welcome to Dental Experts - Special Offers Inside!".to_string();
    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; color: #333;">
            <h2 style="color: {BRAND};">Thank you for getting in touch, {name}!</h2>
            <p>We have received your message and will call you back shortly at <strong>{phone}</strong>.</p>
            <hr style="border: 0; border-top: 1px solid #eee; margin: 20px 0;">
            <h3>Why Choose Dental Experts?</h3>
            <ul>
                <li>Advanced Technology &amp; Painless Treatments</li>
                <li>Experienced Team of Specialists</li>
                <li>Comprehensive Care for the Whole Family</li>
            </ul>
            {offers}
            {signature}
        </div>"#,
        offers = offer_block(),
        signature = signature(),
    );
    (subject, html)
}

pub fn appointment_rescheduled(
    name: &str,
    doctor: &str,
    date: &DateTime<Utc>,
    phone: &str,
) -> (String, String) {
    let subject = "Appointment Rescheduled - Dental Experts".to_string();
    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; color: #333;">
            <h2 style="color: {BRAND};">Appointment Rescheduled!</h2>
            <p>Dear {name},</p>
            <p>Your appointment has been rescheduled.</p>
            <div style="background: #f9f9f9; padding: 15px; border-left: 4px solid {BRAND}; margin: 20px 0;">
                <p><strong>Doctor:</strong> {doctor}</p>
                <p><strong>New Date &amp; Time:</strong> {date}</p>
                <p><strong>Patient Phone:</strong> {phone}</p>
            </div>
            <p>We look forward to seeing you. If you have any questions, please contact us.</p>
            {offers}
            {signature}
        </div>"#,
        date = date.format("%B %d, %Y at %I:%M %p"),
        offers = offer_block(),
        signature = signature(),
    );
    (subject, html)
}

pub fn appointment_completed(name: &str, doctor: &str, date: &DateTime<Utc>) -> (String, String) {
    let subject = "Appointment Completed - Dental Experts".to_string();
    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; color: #333;">
            <h2 style="color: {BRAND};">Appointment Completed</h2>
            <p>Dear {name},</p>
            <p>Thank you for visiting Dental Experts. We hope you had a pleasant experience.</p>
            <div style="background: #f9f9f9; padding: 15px; border-left: 4px solid {BRAND}; margin: 20px 0;">
                <p><strong>Doctor:</strong> {doctor}</p>
                <p><strong>Date Visited:</strong> {date}</p>
            </div>
            <p>Your feedback is valuable to us.</p>
            {offers}
            {signature}
        </div>"#,
        date = date.format("%B %d, %Y"),
        offers = offer_block(),
        signature = signature(),
    );
    (subject, html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn status_templates_format_dates_differently() {
        let date = Utc.with_ymd_and_hms(2026, 3, 10, 14, 30, 0).unwrap();

        let (_, rescheduled) = appointment_rescheduled("Alice", "Dr. Iyer", &date, "555-0100");
        assert!(rescheduled.contains("March 10, 2026 at 02:30 PM"));

        let (_, completed) = appointment_completed("Alice", "Dr. Iyer", &date);
        assert!(completed.contains("March 10, 2026"));
        assert!(!completed.contains("02:30"));
    }

    #[test]
    fn welcome_contains_plaintext_credentials() {
        let (subject, html) = welcome("Alice", "alice@example.com", "secret-pw");
        assert!(subject.contains("Credentials"));
        assert!(html.contains("alice@example.com"));
        assert!(html.contains("secret-pw"));
    }
}
