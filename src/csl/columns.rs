// src/csl/columns.rs

/// Fixed column positions of the consolidated screening list CSV.
///
/// Position meaning never depends on the row's source list; each decoder
/// reads the subset it cares about and ignores the rest. Layout per the
/// trade.gov CSL download instructions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Source,
    EntityNumber,
    Type,
    Programs,
    Name,
    Title,
    Addresses,
    /// Federal Register notice
    FRNotice,
    StartDate,
    EndDate,
    StandardOrder,
    LicenseRequirement,
    LicensePolicy,
    CallSign,
    VesselType,
    GrossTonnage,
    GrossRegisteredTonnage,
    VesselFlag,
    VesselOwner,
    Remarks,
    SourceListURL,
    AltNames,
    Citizenships,
    DatesOfBirth,
    Nationalities,
    PlacesOfBirth,
    SourceInformationURL,
    IDs,
}

impl Column {
    pub const ALL: [Column; 28] = [
        Column::Source,
        Column::EntityNumber,
        Column::Type,
        Column::Programs,
        Column::Name,
        Column::Title,
        Column::Addresses,
        Column::FRNotice,
        Column::StartDate,
        Column::EndDate,
        Column::StandardOrder,
        Column::LicenseRequirement,
        Column::LicensePolicy,
        Column::CallSign,
        Column::VesselType,
        Column::GrossTonnage,
        Column::GrossRegisteredTonnage,
        Column::VesselFlag,
        Column::VesselOwner,
        Column::Remarks,
        Column::SourceListURL,
        Column::AltNames,
        Column::Citizenships,
        Column::DatesOfBirth,
        Column::Nationalities,
        Column::PlacesOfBirth,
        Column::SourceInformationURL,
        Column::IDs,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Zero-based position of this column in a raw row.
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_contiguous_and_ordered() {
        for (i, col) in Column::ALL.iter().enumerate() {
            assert_eq!(col.index(), i, "{:?}", col);
        }
        assert_eq!(Column::Source.index(), 0);
        assert_eq!(Column::Name.index(), 4);
        assert_eq!(Column::SourceListURL.index(), 20);
        assert_eq!(Column::IDs.index(), Column::COUNT - 1);
    }
}
