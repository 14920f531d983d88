// src/csl/records.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::decode::SourceList;

/// Entity List (EL) - Bureau of Industry and Security
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct El {
    /// Listing identifier as published; often blank for this list.
    pub entity_id: String,
    /// Primary name of the entity.
    pub name: String,
    /// Aliases associated with the entity.
    pub alternate_names: Vec<String>,
    /// Known addresses associated with the entity.
    pub addresses: Vec<String>,
    pub programs: Vec<String>,
    pub remarks: Vec<String>,
    pub ids: Vec<String>,
    /// Effective date of the listing.
    pub start_date: String,
    pub standard_order: String,
    /// License requirement imposed on the listed party.
    pub license_requirement: String,
    /// Policy BIS applies when reviewing the license requirement.
    pub license_policy: String,
    /// Federal Register notice that added the entity.
    #[serde(rename = "FRNotice")]
    pub fr_notice: String,
    pub source_list_url: String,
    pub source_info_url: String,
}

/// Military End User (MEU) List - Bureau of Industry and Security
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meu {
    pub entity_id: String,
    pub name: String,
    pub alternate_names: Vec<String>,
    pub addresses: Vec<String>,
    pub programs: Vec<String>,
    pub remarks: Vec<String>,
    pub ids: Vec<String>,
    #[serde(rename = "FRNotice")]
    pub fr_notice: String,
    pub start_date: String,
    pub end_date: String,
    pub source_list_url: String,
    pub source_info_url: String,
}

/// Sectoral Sanctions Identifications List (SSI) - Treasury Department
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ssi {
    /// `ent_num`, the unique listing identifier.
    pub entity_id: String,
    /// Individual, vessel, aircraft, entity, ...
    #[serde(rename = "type")]
    pub entity_type: String,
    /// Sanctions programs the entity is flagged under.
    pub programs: Vec<String>,
    pub name: String,
    pub addresses: Vec<String>,
    /// Free-text details supplied with the listing.
    pub remarks: Vec<String>,
    pub alternate_names: Vec<String>,
    /// Forms of identification on file.
    pub ids: Vec<String>,
    pub source_list_url: String,
    pub source_info_url: String,
}

/// Unverified List (UVL) - Bureau of Industry and Security
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Uvl {
    pub entity_id: String,
    pub name: String,
    pub alternate_names: Vec<String>,
    pub addresses: Vec<String>,
    pub programs: Vec<String>,
    pub remarks: Vec<String>,
    pub ids: Vec<String>,
    pub source_list_url: String,
    pub source_info_url: String,
}

/// Foreign Sanctions Evaders (FSE) - Treasury Department
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fse {
    pub entity_id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub programs: Vec<String>,
    pub name: String,
    pub alternate_names: Vec<String>,
    pub addresses: Vec<String>,
    pub remarks: Vec<String>,
    pub citizenships: Vec<String>,
    pub dates_of_birth: Vec<String>,
    pub ids: Vec<String>,
    pub source_list_url: String,
    pub source_info_url: String,
}

/// Nonproliferation Sanctions (ISN) - State Department
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Isn {
    pub entity_id: String,
    pub programs: Vec<String>,
    pub name: String,
    pub alternate_names: Vec<String>,
    pub addresses: Vec<String>,
    pub remarks: Vec<String>,
    pub ids: Vec<String>,
    #[serde(rename = "FRNotice")]
    pub fr_notice: String,
    pub start_date: String,
    pub source_list_url: String,
    pub source_info_url: String,
}

/// Palestinian Legislative Council List (PLC) - Treasury Department
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plc {
    pub entity_id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub programs: Vec<String>,
    pub name: String,
    pub alternate_names: Vec<String>,
    pub addresses: Vec<String>,
    pub remarks: Vec<String>,
    pub ids: Vec<String>,
    pub dates_of_birth: Vec<String>,
    pub places_of_birth: Vec<String>,
    pub source_list_url: String,
    pub source_info_url: String,
}

/// CAPTA list (CAP) - Treasury Department
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cap {
    pub entity_id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub programs: Vec<String>,
    pub name: String,
    pub addresses: Vec<String>,
    pub remarks: Vec<String>,
    pub alternate_names: Vec<String>,
    pub ids: Vec<String>,
    pub source_list_url: String,
    pub source_info_url: String,
}

/// ITAR Debarred (DTC) - State Department
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dtc {
    pub entity_id: String,
    pub name: String,
    pub alternate_names: Vec<String>,
    pub addresses: Vec<String>,
    pub programs: Vec<String>,
    pub remarks: Vec<String>,
    pub ids: Vec<String>,
    #[serde(rename = "FRNotice")]
    pub fr_notice: String,
    pub source_list_url: String,
    pub source_info_url: String,
}

/// Non-SDN Chinese Military-Industrial Complex Companies List (CMIC) - Treasury Department
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cmic {
    pub entity_id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub programs: Vec<String>,
    pub name: String,
    pub addresses: Vec<String>,
    pub remarks: Vec<String>,
    pub alternate_names: Vec<String>,
    pub ids: Vec<String>,
    pub source_list_url: String,
    pub source_info_url: String,
}

/// Non-SDN Menu-Based Sanctions List (NS-MBS List) - Treasury Department
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NsMbs {
    pub entity_id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub programs: Vec<String>,
    pub name: String,
    pub addresses: Vec<String>,
    pub remarks: Vec<String>,
    pub alternate_names: Vec<String>,
    pub ids: Vec<String>,
    pub source_list_url: String,
    pub source_info_url: String,
}

/// One decoded CSL row, tagged by the list it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CslRecord {
    El(El),
    Meu(Meu),
    Ssi(Ssi),
    Uvl(Uvl),
    Fse(Fse),
    Isn(Isn),
    Plc(Plc),
    Cap(Cap),
    Dtc(Dtc),
    Cmic(Cmic),
    NsMbs(NsMbs),
}

impl CslRecord {
    pub fn source(&self) -> SourceList {
        match self {
            CslRecord::El(_) => SourceList::EntityList,
            CslRecord::Meu(_) => SourceList::MilitaryEndUser,
            CslRecord::Ssi(_) => SourceList::SectoralSanctions,
            CslRecord::Uvl(_) => SourceList::UnverifiedList,
            CslRecord::Fse(_) => SourceList::ForeignSanctionsEvader,
            CslRecord::Isn(_) => SourceList::Nonproliferation,
            CslRecord::Plc(_) => SourceList::PalestinianLegislativeCouncil,
            CslRecord::Cap(_) => SourceList::Capta,
            CslRecord::Dtc(_) => SourceList::ItarDebarred,
            CslRecord::Cmic(_) => SourceList::ChineseMilitaryIndustrial,
            CslRecord::NsMbs(_) => SourceList::MenuBasedSanctions,
        }
    }

    pub fn entity_id(&self) -> &str {
        match self {
            CslRecord::El(r) => &r.entity_id,
            CslRecord::Meu(r) => &r.entity_id,
            CslRecord::Ssi(r) => &r.entity_id,
            CslRecord::Uvl(r) => &r.entity_id,
            CslRecord::Fse(r) => &r.entity_id,
            CslRecord::Isn(r) => &r.entity_id,
            CslRecord::Plc(r) => &r.entity_id,
            CslRecord::Cap(r) => &r.entity_id,
            CslRecord::Dtc(r) => &r.entity_id,
            CslRecord::Cmic(r) => &r.entity_id,
            CslRecord::NsMbs(r) => &r.entity_id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CslRecord::El(r) => &r.name,
            CslRecord::Meu(r) => &r.name,
            CslRecord::Ssi(r) => &r.name,
            CslRecord::Uvl(r) => &r.name,
            CslRecord::Fse(r) => &r.name,
            CslRecord::Isn(r) => &r.name,
            CslRecord::Plc(r) => &r.name,
            CslRecord::Cap(r) => &r.name,
            CslRecord::Dtc(r) => &r.name,
            CslRecord::Cmic(r) => &r.name,
            CslRecord::NsMbs(r) => &r.name,
        }
    }
}

/// Every record of one CSL file, grouped by source list in file order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Csl {
    pub els: Vec<El>,
    pub meus: Vec<Meu>,
    pub ssis: Vec<Ssi>,
    pub uvls: Vec<Uvl>,
    pub fses: Vec<Fse>,
    pub isns: Vec<Isn>,
    pub plcs: Vec<Plc>,
    pub caps: Vec<Cap>,
    pub dtcs: Vec<Dtc>,
    pub cmics: Vec<Cmic>,
    pub ns_mbss: Vec<NsMbs>,
}

impl Csl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `record` to the sequence of its source list.
    pub fn push(&mut self, record: CslRecord) {
        match record {
            CslRecord::El(r) => self.els.push(r),
            CslRecord::Meu(r) => self.meus.push(r),
            CslRecord::Ssi(r) => self.ssis.push(r),
            CslRecord::Uvl(r) => self.uvls.push(r),
            CslRecord::Fse(r) => self.fses.push(r),
            CslRecord::Isn(r) => self.isns.push(r),
            CslRecord::Plc(r) => self.plcs.push(r),
            CslRecord::Cap(r) => self.caps.push(r),
            CslRecord::Dtc(r) => self.dtcs.push(r),
            CslRecord::Cmic(r) => self.cmics.push(r),
            CslRecord::NsMbs(r) => self.ns_mbss.push(r),
        }
    }

    pub fn count(&self, source: SourceList) -> usize {
        match source {
            SourceList::EntityList => self.els.len(),
            SourceList::MilitaryEndUser => self.meus.len(),
            SourceList::SectoralSanctions => self.ssis.len(),
            SourceList::UnverifiedList => self.uvls.len(),
            SourceList::ForeignSanctionsEvader => self.fses.len(),
            SourceList::Nonproliferation => self.isns.len(),
            SourceList::PalestinianLegislativeCouncil => self.plcs.len(),
            SourceList::Capta => self.caps.len(),
            SourceList::ItarDebarred => self.dtcs.len(),
            SourceList::ChineseMilitaryIndustrial => self.cmics.len(),
            SourceList::MenuBasedSanctions => self.ns_mbss.len(),
        }
    }

    /// Record count per source list, including lists with zero records.
    pub fn counts(&self) -> BTreeMap<SourceList, usize> {
        SourceList::ALL
            .iter()
            .map(|&source| (source, self.count(source)))
            .collect()
    }

    /// Total records across all eleven lists.
    pub fn len(&self) -> usize {
        SourceList::ALL.iter().map(|&s| self.count(s)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
