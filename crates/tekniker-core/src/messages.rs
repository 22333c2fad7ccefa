//! User-facing (Norwegian) messages returned in JSON bodies.
//!
//! Technicians only ever see these strings; log lines stay in English.

pub const EMAIL_REQUIRED: &str = "E-postadresse er påkrevd.";
pub const EMAIL_NOT_APPROVED: &str = "E-postadresse eller domene er ikke godkjent.";
pub const CODE_SENT: &str = "Autentiseringskode sendt.";
pub const CODE_SEND_FAILED: &str = "Kunne ikke sende autentiseringskode.";
pub const EMAIL_AND_CODE_REQUIRED: &str = "E-postadresse og kode er påkrevd.";
pub const NO_CODE_REQUESTED: &str = "Ingen kode er forespurt for denne e-postadressen.";
pub const INVALID_CODE: &str = "Ugyldig kode.";
pub const LOGIN_OK: &str = "Innlogging vellykket.";
pub const LOGGED_OUT: &str = "Logget ut.";

pub const AUTH_REQUIRED: &str = "Autentisering kreves.";
pub const UPSTREAM_AUTH_FAILED: &str = "Autentisering feilet.";
pub const MAC_REQUIRED: &str = "MAC-adresse er påkrevd.";
pub const MAC_INVALID: &str = "Ugyldig MAC-adresse.";
pub const ROLE_NOT_ALLOWED: &str = "Du har ikke tilgang til denne rollen.";
pub const ROLE_ID_INVALID: &str = "Ugyldig rolle-ID.";
pub const INVALID_PAYLOAD: &str = "Ugyldig forespørsel.";

pub const DEVICE_FETCH_FAILED: &str = "Kunne ikke hente enhetsinformasjon.";
pub const DEVICE_CREATE_FAILED: &str = "Kunne ikke opprette enhet.";
pub const DEVICE_UPDATE_FAILED: &str = "Kunne ikke oppdatere enhet.";
pub const ROLES_FETCH_FAILED: &str = "Kunne ikke hente enhetsroller.";
pub const ALLOWLIST_LOAD_FAILED: &str = "Kunne ikke laste godkjente domener.";

pub const INTERNAL_ERROR: &str = "En intern feil oppstod.";

/// Message for a missing set of required fields, e.g. `["mac", "role_id"]`.
pub fn missing_fields(fields: &[&str]) -> String {
    let list = fields
        .iter()
        .map(|f| format!("'{f}'"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Påkrevde felt mangler: [{list}]")
}

/// Message returned with HTTP 429.
pub fn rate_limited(retry_after: u64) -> String {
    format!(
        "Du har nådd grensen for antall forespørsler. Du kan prøve igjen om {retry_after} sekunder."
    )
}
