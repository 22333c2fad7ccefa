//! Text and HTML bodies for the login code email.

/// Subject line of the login code email.
pub const AUTH_CODE_SUBJECT: &str = "Din engangskode for innlogging til Aruba ClearPass";

/// A rendered login code email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCodeEmail {
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub text: String,
    /// HTML alternative body.
    pub html: String,
}

impl AuthCodeEmail {
    /// Render the email for a code valid for `valid_minutes`.
    pub fn render(code: &str, valid_minutes: u64) -> Self {
        let text = format!(
            "Hei!\n\
             \n\
             Du har bedt om en engangskode for å logge inn i NorgesGruppens Aruba ClearPass administrasjonsløsning.\n\
             \n\
             Din kode er: {code}\n\
             \n\
             Denne koden er gyldig i {valid_minutes} minutter og kan kun brukes én gang.\n\
             \n\
             Hvis du ikke har bedt om denne koden, kan du se bort fra denne e-posten.\n\
             \n\
             Med vennlig hilsen\n\
             NorgesGruppen Data AS\n"
        );

        let html = format!(
            r#"<html>
  <body style="font-family: sans-serif; color: #333;">
    <p>Hei!</p>
    <p>Du har bedt om en engangskode for å logge inn i <strong>NorgesGruppens Aruba ClearPass administrasjonsløsning</strong>.</p>
    <p><strong>Din kode er:</strong></p>
    <p style="font-size: 1.5em; font-weight: bold; color: #005EB8;">{code}</p>
    <p>Koden er gyldig i <strong>{valid_minutes} minutter</strong> og kan kun brukes én gang.</p>
    <p>Hvis du ikke har bedt om denne koden, kan du se bort fra denne e-posten.</p>
    <p>Med vennlig hilsen,<br>NorgesGruppen Data AS</p>
  </body>
</html>
"#
        );

        Self {
            subject: AUTH_CODE_SUBJECT.to_string(),
            text,
            html,
        }
    }
}
