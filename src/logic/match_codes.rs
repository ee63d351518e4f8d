//! Umpire match codes: issue a short code per match, verify it before scoring.

use crate::models::{MatchCode, MatchId, Result, Tournament, TournamentError};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const CODE_LENGTH: usize = 6;
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Hours a code stays valid when no other lifetime is configured.
pub const DEFAULT_CODE_TTL_HOURS: i64 = 24;

/// A code handed out by [`issue_match_code`]; `newly_issued` is false when an
/// existing, unexpired code was returned instead.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct IssuedCode {
    #[serde(flatten)]
    pub code: MatchCode,
    pub newly_issued: bool,
}

/// Random code of [`CODE_LENGTH`] characters from A-Z and 0-9.
pub fn random_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..CODE_LENGTH)
        .map(|_| char::from(CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())]))
        .collect()
}

/// Issue the code for a match. Asking again returns the same code until it expires.
pub fn issue_match_code<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    match_id: MatchId,
    assigned_umpire: &str,
    now: DateTime<Utc>,
    ttl: Duration,
    rng: &mut R,
) -> Result<IssuedCode> {
    let umpire = assigned_umpire.trim();
    if umpire.is_empty() {
        return Err(TournamentError::InvalidRequest("assigned_umpire must not be empty".into()));
    }
    if tournament.get_match(match_id)?.is_bye() {
        return Err(TournamentError::InvalidRequest(format!(
            "match {match_id} is a bye and is never played"
        )));
    }

    if let Some(existing) = tournament.match_codes.get(&match_id) {
        if !existing.is_expired(now) {
            return Ok(IssuedCode {
                code: existing.clone(),
                newly_issued: false,
            });
        }
        log::info!("match {}: code expired at {}, issuing a new one", match_id, existing.expires_at);
    }

    let code = MatchCode {
        match_id,
        code: random_code(rng),
        assigned_umpire: umpire.to_string(),
        expires_at: now + ttl,
    };
    tournament.match_codes.insert(match_id, code.clone());
    log::info!("match {}: issued code for umpire '{}'", match_id, umpire);
    Ok(IssuedCode {
        code,
        newly_issued: true,
    })
}

/// Check a code typed in by an umpire. Comparison ignores case and surrounding spaces.
pub fn verify_match_code<'a>(
    tournament: &'a Tournament,
    match_id: MatchId,
    code: &str,
    now: DateTime<Utc>,
) -> Result<&'a MatchCode> {
    let stored = tournament
        .match_codes
        .get(&match_id)
        .filter(|c| c.code.eq_ignore_ascii_case(code.trim()))
        .ok_or(TournamentError::InvalidMatchCode)?;
    if stored.is_expired(now) {
        log::warn!("match {}: rejected expired code", match_id);
        return Err(TournamentError::MatchCodeExpired);
    }
    Ok(stored)
}
