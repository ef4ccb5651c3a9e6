use crate::domain::model::Availability;

/// Phrases that appointment systems show when nothing is bookable.
/// Matched case-insensitively against the raw page body.
const NEGATIVE_MARKERS: [&str; 5] = [
    "no appointments are available",
    "no appointment available",
    "there are no appointments available",
    "no appointment times available",
    "currently no appointments available",
];

/// Heuristic availability classification of a fetched page body.
///
/// An empty body means the fetch failed, so the status is unknown. A body
/// carrying any negative marker means no slots. A page that loaded and has
/// no negative marker might have slots worth a manual look.
pub fn classify(body: &str, extra_markers: &[String]) -> Availability {
    if body.trim().is_empty() {
        return Availability::Unknown;
    }

    let lower = body.to_lowercase();
    let negative = NEGATIVE_MARKERS.iter().any(|m| lower.contains(m))
        || extra_markers
            .iter()
            .filter(|m| !m.trim().is_empty())
            .any(|m| lower.contains(&m.to_lowercase()));

    if negative {
        Availability::NoSlots
    } else {
        Availability::PossibleSlots
    }
}
