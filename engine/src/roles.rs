//! Random role handout.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::error::{ShuffleError, ShuffleResult};

/// One member and the role they drew, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub name: String,
    pub role: Option<String>,
}

impl RoleAssignment {
    pub fn new(name: impl Into<String>, role: Option<String>) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

impl fmt::Display for RoleAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.role.as_deref().unwrap_or(""))
    }
}

/// Hand out `roles` to randomly chosen members.
///
/// Each role goes to a different member; with more members than roles the
/// rest get `None`, with more roles than members the extra roles go unused.
/// Assigned members come first in drawing order, followed by the
/// unassigned ones in roster order.
pub fn assign_roles<R: Rng + ?Sized>(
    names: &[String],
    roles: &[String],
    rng: &mut R,
) -> ShuffleResult<Vec<RoleAssignment>> {
    if names.is_empty() {
        return Err(ShuffleError::EmptyRoster);
    }
    let roles: Vec<&str> = roles
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .collect();
    if roles.is_empty() {
        return Err(ShuffleError::EmptyRoles);
    }

    let mut drawn: Vec<usize> = (0..names.len()).collect();
    drawn.shuffle(rng);
    let handed = roles.len().min(names.len());

    let mut assigned = vec![false; names.len()];
    let mut out = Vec::with_capacity(names.len());
    for (&idx, role) in drawn.iter().zip(&roles).take(handed) {
        assigned[idx] = true;
        out.push(RoleAssignment::new(&names[idx], Some((*role).to_string())));
    }
    out.extend(
        names
            .iter()
            .zip(&assigned)
            .filter(|(_, taken)| !**taken)
            .map(|(name, _)| RoleAssignment::new(name, None)),
    );

    info!(
        members = names.len(),
        roles = roles.len(),
        handed,
        "Roles assigned"
    );
    Ok(out)
}
