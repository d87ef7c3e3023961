
use chrono::{DateTime, Utc};

/// Classification of a regional release-date entry, mirroring the numeric
/// release type codes (1-6) used by the metadata provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseKind {
    /// Festival or premiere screening (code 1).
    Premiere,
    /// Limited theatrical run (code 2).
    TheatricalLimited,
    /// Wide cinema opening (code 3).
    Theatrical,
    /// Streaming/purchase availability (code 4).
    Digital,
    /// Physical media release (code 5).
    Physical,
    /// TV broadcast (code 6).
    Tv,
}

impl ReleaseKind {
    /// Maps a provider release type code to a kind. Unknown codes yield
    /// `None` and the entry is dropped by the caller.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Premiere),
            2 => Some(Self::TheatricalLimited),
            3 => Some(Self::Theatrical),
            4 => Some(Self::Digital),
            5 => Some(Self::Physical),
            6 => Some(Self::Tv),
            _ => None,
        }
    }
}

/// A single dated release in one country.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseDateEntry {
    /// What kind of release the date refers to.
    pub kind: ReleaseKind,
    /// When it happens (or happened).
    pub date: DateTime<Utc>,
}

/// All release dates for one country, in provider order.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryReleases {
    /// ISO 3166-1 alpha-2 country code, e.g. "US".
    pub country: String,
    /// Dated releases for this country, in provider order.
    pub entries: Vec<ReleaseDateEntry>,
}

/// Every release date known for one title, grouped by country.
///
/// Country iteration order is the order the provider returned them in; when
/// the provider lists several entries for the same `(country, kind)` pair the
/// first one seen wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionalReleaseSet {
    /// Per-country release groups, in provider order.
    pub countries: Vec<CountryReleases>,
}

impl RegionalReleaseSet {
    /// First entry of `kind` for `country` in provider order, if any.
    fn first_of_kind(&self, country: &str, kind: ReleaseKind) -> Option<DateTime<Utc>> {
        self.countries
            .iter()
            .filter(|c| c.country == country)
            .flat_map(|c| c.entries.iter())
            .find(|e| e.kind == kind)
            .map(|e| e.date)
    }
}

/// Theatrical and digital dates for the two primary markets.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PrimaryDates {
    /// US theatrical release, if known.
    pub cinema_us: Option<DateTime<Utc>>,
    /// ES theatrical release, if known.
    pub cinema_es: Option<DateTime<Utc>>,
    /// US digital release, if known.
    pub digital_us: Option<DateTime<Utc>>,
    /// ES digital release, if known.
    pub digital_es: Option<DateTime<Utc>>,
}

impl PrimaryDates {
    /// True when the provider had no data at all for the primary markets.
    pub fn is_empty(&self) -> bool {
        self.cinema_us.is_none()
            && self.cinema_es.is_none()
            && self.digital_us.is_none()
            && self.digital_es.is_none()
    }
}

/// What to report for a title that is not fully available yet.
#[derive(Debug, Clone, PartialEq)]
pub enum AvailabilityDecision {
    /// A primary-market date lies in the future. All known primary dates are
    /// carried along as informational companions, including past ones.
    PrimaryRegion(PrimaryDates),
    /// No primary-market data existed at all; the first other country with a
    /// future theatrical date.
    FallbackRegion {
        /// ISO 3166-1 alpha-2 country code of the fallback market.
        country: String,
        /// That country's theatrical release date (in the future).
        cinema: DateTime<Utc>,
        /// That country's digital release date, if one was listed.
        digital: Option<DateTime<Utc>>,
    },
    /// Nothing upcoming to report. Callers suppress the notification.
    NoUpcomingRelease,
}

/// Pulls the distinguished primary-market dates out of a release set.
///
/// Missing entries are simply absent; this never fails.
pub fn extract_primary_dates(releases: &RegionalReleaseSet) -> PrimaryDates {
    PrimaryDates {
        cinema_us: releases.first_of_kind("US", ReleaseKind::Theatrical),
        cinema_es: releases.first_of_kind("ES", ReleaseKind::Theatrical),
        digital_us: releases.first_of_kind("US", ReleaseKind::Digital),
        digital_es: releases.first_of_kind("ES", ReleaseKind::Digital),
    }
}

// Gate order for the primary markets. Evaluated top to bottom; the first
// gate whose date is strictly after `now` wins.
const PRIMARY_GATES: [fn(&PrimaryDates) -> Option<DateTime<Utc>>; 4] = [
    |d| d.cinema_us,
    |d| d.cinema_es,
    |d| d.digital_us,
    |d| d.digital_es,
];

/// Decides which release window to report for a not-yet-available title.
///
/// `now` must be captured once by the caller so that every comparison in one
/// resolution sees the same instant.
pub fn resolve(releases: &RegionalReleaseSet, now: DateTime<Utc>) -> AvailabilityDecision {
    let primary = extract_primary_dates(releases);

    for gate in PRIMARY_GATES {
        if gate(&primary).is_some_and(|date| date > now) {
            return AvailabilityDecision::PrimaryRegion(primary);
        }
    }

    // The fallback scan only runs when the primary markets had no data at
    // all. Primary dates that exist but lie in the past mean the title is
    // late, not unreleased everywhere.
    if !primary.is_empty() {
        return AvailabilityDecision::NoUpcomingRelease;
    }

    fallback_region(releases, now)
}

/// First country in provider order whose theatrical date is still ahead.
fn fallback_region(releases: &RegionalReleaseSet, now: DateTime<Utc>) -> AvailabilityDecision {
    for country in &releases.countries {
        let cinema = country
            .entries
            .iter()
            .find(|e| e.kind == ReleaseKind::Theatrical)
            .map(|e| e.date);

        if let Some(cinema) = cinema
            && cinema > now
        {
            let digital = country
                .entries
                .iter()
                .find(|e| e.kind == ReleaseKind::Digital)
                .map(|e| e.date);

            return AvailabilityDecision::FallbackRegion {
                country: country.country.clone(),
                cinema,
                digital,
            };
        }
    }

    AvailabilityDecision::NoUpcomingRelease
}
