//! The synchronous core of a poll cycle.

use super::aggregate::group_by_symbol;
use super::error::DomainError;
use super::observation::{NormalizedObservation, RawObservation};
use super::opportunity::{compute_opportunities, Opportunity};
use super::rank::rank_opportunities;

/// Reduce raw observations to a ranked opportunity list.
///
/// Standardizes and normalizes every observation, groups them by canonical
/// symbol, builds an opportunity per group with at least two quotes, and
/// ranks the result widest spread first.
///
/// # Errors
///
/// Fails as a whole if any observation breaks the observation contract; no
/// partial list is returned.
pub fn process_observations<I>(raw: I) -> Result<Vec<Opportunity>, DomainError>
where
    I: IntoIterator<Item = RawObservation>,
{
    let normalized = raw
        .into_iter()
        .map(RawObservation::normalize)
        .collect::<Result<Vec<Option<NormalizedObservation>>, _>>()?;

    let groups = group_by_symbol(normalized);
    Ok(rank_opportunities(compute_opportunities(groups)))
}
