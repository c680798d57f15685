use chrono::NaiveTime;
use dotenvy::dotenv;
use std::env;

use crate::payroll::{CycleBoundary, PayrollPolicy, WeeklyOffRule};

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub access_token_ttl: usize,

    /// Destination for the admin password-reset OTP
    pub admin_mobile: String,
    /// Bootstrap credential seeded into admin_config on first boot
    pub admin_default_password: String,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_punch_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    // Payroll policy (both observed variants of each knob are reachable;
    // see DESIGN.md before changing defaults)
    pub pay_cycle_end_day: u32,
    pub half_day_cutoff: Option<NaiveTime>,
    pub weekly_off_paid: bool,
    pub punch_require_location: bool,

    pub geocode_base_url: String,
    pub sms_gateway_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_token_ttl: env::var("ACCESS_TOKEN_TTL")
                .unwrap_or_else(|_| "3600".to_string()) // default 1h
                .parse()
                .unwrap(),

            admin_mobile: env::var("ADMIN_MOBILE").unwrap_or_else(|_| "9978815870".to_string()),
            admin_default_password: env::var("ADMIN_DEFAULT_PASSWORD")
                .unwrap_or_else(|_| "admin123".to_string()),

            rate_login_per_min: env::var("RATE_LOGIN_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_punch_per_min: env::var("RATE_PUNCH_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            pay_cycle_end_day: env::var("PAY_CYCLE_END")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .unwrap(),
            half_day_cutoff: parse_cutoff(
                &env::var("HALF_DAY_CUTOFF").unwrap_or_else(|_| "10:30".to_string()),
            ),
            weekly_off_paid: env::var("WEEKLY_OFF_PAID")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap(),
            punch_require_location: env::var("PUNCH_REQUIRE_LOCATION")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap(),

            geocode_base_url: env::var("GEOCODE_BASE_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string()),
            sms_gateway_url: env::var("SMS_GATEWAY_URL").ok().filter(|s| !s.is_empty()),
        }
    }

    /// The reconciliation policy selected by configuration.
    pub fn payroll_policy(&self) -> PayrollPolicy {
        PayrollPolicy {
            weekly_off: if self.weekly_off_paid {
                WeeklyOffRule::PaidWhenActiveInCycle
            } else {
                WeeklyOffRule::Unpaid
            },
            half_day_cutoff: self.half_day_cutoff,
            cycle_boundary: CycleBoundary::from_end_day(self.pay_cycle_end_day)
                .expect("PAY_CYCLE_END must be 4 or 5"),
        }
    }
}

/// Empty string disables the half-day status entirely.
fn parse_cutoff(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Some(NaiveTime::parse_from_str(raw, "%H:%M").expect("HALF_DAY_CUTOFF must be HH:MM"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_parses_and_empty_disables() {
        assert_eq!(parse_cutoff("10:30"), NaiveTime::from_hms_opt(10, 30, 0));
        assert_eq!(parse_cutoff(""), None);
        assert_eq!(parse_cutoff("  "), None);
    }
}
