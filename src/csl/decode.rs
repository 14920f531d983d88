// src/csl/decode.rs

use csv::StringRecord;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

use super::columns::Column;
use super::multi::split_multi;
use super::records::{Cap, Cmic, CslRecord, Dtc, El, Fse, Isn, Meu, NsMbs, Plc, Ssi, Uvl};

/// The government lists interleaved in the consolidated screening list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SourceList {
    EntityList,
    MilitaryEndUser,
    SectoralSanctions,
    UnverifiedList,
    ForeignSanctionsEvader,
    Nonproliferation,
    PalestinianLegislativeCouncil,
    Capta,
    ItarDebarred,
    ChineseMilitaryIndustrial,
    MenuBasedSanctions,
}

/// Discriminator → list. Both the short code and the full label published
/// in the `source` column resolve; matching is exact.
static DISCRIMINATORS: Lazy<HashMap<&'static str, SourceList>> = Lazy::new(|| {
    let mut map = HashMap::with_capacity(SourceList::ALL.len() * 2);
    for source in SourceList::ALL {
        map.insert(source.code(), source);
        map.insert(source.label(), source);
    }
    map
});

impl SourceList {
    pub const ALL: [SourceList; 11] = [
        SourceList::EntityList,
        SourceList::MilitaryEndUser,
        SourceList::SectoralSanctions,
        SourceList::UnverifiedList,
        SourceList::ForeignSanctionsEvader,
        SourceList::Nonproliferation,
        SourceList::PalestinianLegislativeCouncil,
        SourceList::Capta,
        SourceList::ItarDebarred,
        SourceList::ChineseMilitaryIndustrial,
        SourceList::MenuBasedSanctions,
    ];

    /// Look up the list a `source` cell belongs to.
    pub fn from_discriminator(value: &str) -> Option<Self> {
        DISCRIMINATORS.get(value).copied()
    }

    pub fn code(&self) -> &'static str {
        match self {
            SourceList::EntityList => "EL",
            SourceList::MilitaryEndUser => "MEU",
            SourceList::SectoralSanctions => "SSI",
            SourceList::UnverifiedList => "UVL",
            SourceList::ForeignSanctionsEvader => "FSE",
            SourceList::Nonproliferation => "ISN",
            SourceList::PalestinianLegislativeCouncil => "PLC",
            SourceList::Capta => "CAP",
            SourceList::ItarDebarred => "DTC",
            SourceList::ChineseMilitaryIndustrial => "CMIC",
            SourceList::MenuBasedSanctions => "NS-MBS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SourceList::EntityList => "Entity List (EL) - Bureau of Industry and Security",
            SourceList::MilitaryEndUser => {
                "Military End User (MEU) List - Bureau of Industry and Security"
            }
            SourceList::SectoralSanctions => {
                "Sectoral Sanctions Identifications List (SSI) - Treasury Department"
            }
            SourceList::UnverifiedList => "Unverified List (UVL) - Bureau of Industry and Security",
            SourceList::ForeignSanctionsEvader => {
                "Foreign Sanctions Evaders (FSE) - Treasury Department"
            }
            SourceList::Nonproliferation => "Nonproliferation Sanctions (ISN) - State Department",
            SourceList::PalestinianLegislativeCouncil => {
                "Palestinian Legislative Council List (PLC) - Treasury Department"
            }
            SourceList::Capta => "Capta List (CAP) - Treasury Department",
            SourceList::ItarDebarred => "ITAR Debarred (DTC) - State Department",
            SourceList::ChineseMilitaryIndustrial => {
                "Non-SDN Chinese Military-Industrial Complex Companies List (CMIC) - Treasury Department"
            }
            SourceList::MenuBasedSanctions => {
                "Non-SDN Menu-Based Sanctions List (NS-MBS List) - Treasury Department"
            }
        }
    }

    /// Run this list's decoder over `row`.
    pub fn decode(&self, row: &Row<'_>) -> CslRecord {
        match self {
            SourceList::EntityList => decode_el(row),
            SourceList::MilitaryEndUser => decode_meu(row),
            SourceList::SectoralSanctions => decode_ssi(row),
            SourceList::UnverifiedList => decode_uvl(row),
            SourceList::ForeignSanctionsEvader => decode_fse(row),
            SourceList::Nonproliferation => decode_isn(row),
            SourceList::PalestinianLegislativeCouncil => decode_plc(row),
            SourceList::Capta => decode_cap(row),
            SourceList::ItarDebarred => decode_dtc(row),
            SourceList::ChineseMilitaryIndustrial => decode_cmic(row),
            SourceList::MenuBasedSanctions => decode_ns_mbs(row),
        }
    }
}

/// Positional view over one raw CSL row. Cells past the end read as empty.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    record: &'a StringRecord,
}

impl<'a> Row<'a> {
    pub fn new(record: &'a StringRecord) -> Self {
        Self { record }
    }

    pub fn len(&self) -> usize {
        self.record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    pub fn has(&self, col: Column) -> bool {
        col.index() < self.record.len()
    }

    /// Raw cell, verbatim.
    pub fn cell(&self, col: Column) -> &'a str {
        self.record.get(col.index()).unwrap_or("")
    }

    pub fn text(&self, col: Column) -> String {
        self.cell(col).to_string()
    }

    pub fn list(&self, col: Column) -> Vec<String> {
        split_multi(self.cell(col))
    }
}

fn decode_el(row: &Row<'_>) -> CslRecord {
    CslRecord::El(El {
        entity_id: row.text(Column::EntityNumber),
        name: row.text(Column::Name),
        alternate_names: row.list(Column::AltNames),
        addresses: row.list(Column::Addresses),
        programs: row.list(Column::Programs),
        remarks: row.list(Column::Remarks),
        ids: row.list(Column::IDs),
        start_date: row.text(Column::StartDate),
        standard_order: row.text(Column::StandardOrder),
        license_requirement: row.text(Column::LicenseRequirement),
        license_policy: row.text(Column::LicensePolicy),
        fr_notice: row.text(Column::FRNotice),
        source_list_url: row.text(Column::SourceListURL),
        source_info_url: row.text(Column::SourceInformationURL),
    })
}

fn decode_meu(row: &Row<'_>) -> CslRecord {
    CslRecord::Meu(Meu {
        entity_id: row.text(Column::EntityNumber),
        name: row.text(Column::Name),
        alternate_names: row.list(Column::AltNames),
        addresses: row.list(Column::Addresses),
        programs: row.list(Column::Programs),
        remarks: row.list(Column::Remarks),
        ids: row.list(Column::IDs),
        fr_notice: row.text(Column::FRNotice),
        start_date: row.text(Column::StartDate),
        end_date: row.text(Column::EndDate),
        source_list_url: row.text(Column::SourceListURL),
        source_info_url: row.text(Column::SourceInformationURL),
    })
}

fn decode_ssi(row: &Row<'_>) -> CslRecord {
    CslRecord::Ssi(Ssi {
        entity_id: row.text(Column::EntityNumber),
        entity_type: row.text(Column::Type),
        programs: row.list(Column::Programs),
        name: row.text(Column::Name),
        addresses: row.list(Column::Addresses),
        remarks: row.list(Column::Remarks),
        alternate_names: row.list(Column::AltNames),
        ids: row.list(Column::IDs),
        source_list_url: row.text(Column::SourceListURL),
        source_info_url: row.text(Column::SourceInformationURL),
    })
}

fn decode_uvl(row: &Row<'_>) -> CslRecord {
    CslRecord::Uvl(Uvl {
        entity_id: row.text(Column::EntityNumber),
        name: row.text(Column::Name),
        alternate_names: row.list(Column::AltNames),
        addresses: row.list(Column::Addresses),
        programs: row.list(Column::Programs),
        remarks: row.list(Column::Remarks),
        ids: row.list(Column::IDs),
        source_list_url: row.text(Column::SourceListURL),
        source_info_url: row.text(Column::SourceInformationURL),
    })
}

fn decode_fse(row: &Row<'_>) -> CslRecord {
    CslRecord::Fse(Fse {
        entity_id: row.text(Column::EntityNumber),
        entity_type: row.text(Column::Type),
        programs: row.list(Column::Programs),
        name: row.text(Column::Name),
        alternate_names: row.list(Column::AltNames),
        addresses: row.list(Column::Addresses),
        remarks: row.list(Column::Remarks),
        citizenships: row.list(Column::Citizenships),
        dates_of_birth: row.list(Column::DatesOfBirth),
        ids: row.list(Column::IDs),
        source_list_url: row.text(Column::SourceListURL),
        source_info_url: row.text(Column::SourceInformationURL),
    })
}

fn decode_isn(row: &Row<'_>) -> CslRecord {
    CslRecord::Isn(Isn {
        entity_id: row.text(Column::EntityNumber),
        programs: row.list(Column::Programs),
        name: row.text(Column::Name),
        alternate_names: row.list(Column::AltNames),
        addresses: row.list(Column::Addresses),
        remarks: row.list(Column::Remarks),
        ids: row.list(Column::IDs),
        fr_notice: row.text(Column::FRNotice),
        start_date: row.text(Column::StartDate),
        source_list_url: row.text(Column::SourceListURL),
        source_info_url: row.text(Column::SourceInformationURL),
    })
}

fn decode_plc(row: &Row<'_>) -> CslRecord {
    CslRecord::Plc(Plc {
        entity_id: row.text(Column::EntityNumber),
        entity_type: row.text(Column::Type),
        programs: row.list(Column::Programs),
        name: row.text(Column::Name),
        alternate_names: row.list(Column::AltNames),
        addresses: row.list(Column::Addresses),
        remarks: row.list(Column::Remarks),
        ids: row.list(Column::IDs),
        dates_of_birth: row.list(Column::DatesOfBirth),
        places_of_birth: row.list(Column::PlacesOfBirth),
        source_list_url: row.text(Column::SourceListURL),
        source_info_url: row.text(Column::SourceInformationURL),
    })
}

fn decode_cap(row: &Row<'_>) -> CslRecord {
    CslRecord::Cap(Cap {
        entity_id: row.text(Column::EntityNumber),
        entity_type: row.text(Column::Type),
        programs: row.list(Column::Programs),
        name: row.text(Column::Name),
        addresses: row.list(Column::Addresses),
        remarks: row.list(Column::Remarks),
        alternate_names: row.list(Column::AltNames),
        ids: row.list(Column::IDs),
        source_list_url: row.text(Column::SourceListURL),
        source_info_url: row.text(Column::SourceInformationURL),
    })
}

fn decode_dtc(row: &Row<'_>) -> CslRecord {
    CslRecord::Dtc(Dtc {
        entity_id: row.text(Column::EntityNumber),
        name: row.text(Column::Name),
        alternate_names: row.list(Column::AltNames),
        addresses: row.list(Column::Addresses),
        programs: row.list(Column::Programs),
        remarks: row.list(Column::Remarks),
        ids: row.list(Column::IDs),
        fr_notice: row.text(Column::FRNotice),
        source_list_url: row.text(Column::SourceListURL),
        source_info_url: row.text(Column::SourceInformationURL),
    })
}

fn decode_cmic(row: &Row<'_>) -> CslRecord {
    CslRecord::Cmic(Cmic {
        entity_id: row.text(Column::EntityNumber),
        entity_type: row.text(Column::Type),
        programs: row.list(Column::Programs),
        name: row.text(Column::Name),
        addresses: row.list(Column::Addresses),
        remarks: row.list(Column::Remarks),
        alternate_names: row.list(Column::AltNames),
        ids: row.list(Column::IDs),
        source_list_url: row.text(Column::SourceListURL),
        source_info_url: row.text(Column::SourceInformationURL),
    })
}

fn decode_ns_mbs(row: &Row<'_>) -> CslRecord {
    CslRecord::NsMbs(NsMbs {
        entity_id: row.text(Column::EntityNumber),
        entity_type: row.text(Column::Type),
        programs: row.list(Column::Programs),
        name: row.text(Column::Name),
        addresses: row.list(Column::Addresses),
        remarks: row.list(Column::Remarks),
        alternate_names: row.list(Column::AltNames),
        ids: row.list(Column::IDs),
        source_list_url: row.text(Column::SourceListURL),
        source_info_url: row.text(Column::SourceInformationURL),
    })
}
