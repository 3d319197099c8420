//! Conversion of a flat JSON export of ministers into three CSV tables.
//!
//! Every input record describes one person holding one position while being
//! a member of one party. The same person, position or party usually shows
//! up in many records; each table keeps the first occurrence of its key.

use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::DoxrstError;
use crate::DoxrstResult;

/// Positions without an end date only count when they started after this.
pub const OPEN_POSITION_CUTOFF: &str = "1950";

const PERSON_HEADERS: [&str; 5] = ["id", "name", "gender", "birth", "death"];
const POSITION_HEADERS: [&str; 5] = ["id", "position", "country", "start", "until"];
const PARTY_HEADERS: [&str; 2] = ["id", "party"];

/// One record of the JSON export.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SourceRecord {
	pub person: Option<String>,
	#[serde(rename = "personLabel")]
	pub person_label: Option<String>,
	#[serde(rename = "genderLabel")]
	pub gender_label: Option<String>,
	#[serde(rename = "birthISO")]
	pub birth: Option<String>,
	#[serde(rename = "deathISO")]
	pub death: Option<String>,
	#[serde(rename = "ministerLabel")]
	pub minister_label: Option<String>,
	#[serde(rename = "startISO")]
	pub start: Option<String>,
	#[serde(rename = "endISO")]
	pub end: Option<String>,
	#[serde(rename = "partyLabel")]
	pub party_label: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PersonRow {
	pub id: String,
	pub name: Option<String>,
	pub gender: Option<String>,
	pub birth: Option<String>,
	pub death: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PositionRow {
	pub id: String,
	pub position: Option<String>,
	pub country: String,
	pub start: String,
	pub until: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PartyRow {
	pub id: String,
	pub party: String,
}

/// The three output tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tables {
	pub persons: Vec<PersonRow>,
	pub positions: Vec<PositionRow>,
	pub parties: Vec<PartyRow>,
}

/// Paths and row counts of a finished conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertSummary {
	pub person_file: PathBuf,
	pub position_file: PathBuf,
	pub party_file: PathBuf,
	pub persons: usize,
	pub positions: usize,
	pub parties: usize,
}

/// Strip everything up to and including the last `/Q` of an entity url.
pub fn person_id(person: &str) -> &str {
	person
		.rfind("/Q")
		.map_or(person, |index| &person[index + 2..])
}

/// Whether a position row is kept. Dates are compared as strings.
pub fn keeps_position(start: Option<&str>, end: Option<&str>) -> bool {
	let Some(start) = start else {
		return false;
	};

	match end {
		None => start > OPEN_POSITION_CUTOFF,
		Some(end) => end >= start,
	}
}

/// Read the JSON array at `path`.
pub fn read_records(path: &Path) -> DoxrstResult<Vec<SourceRecord>> {
	let content = std::fs::read_to_string(path)?;

	serde_json::from_str(&content).map_err(|e| {
		DoxrstError::Json {
			path: path.display().to_string(),
			reason: e.to_string(),
		}
	})
}

/// Build the person, position and party tables for `country`.
pub fn build_tables(records: &[SourceRecord], country: &str) -> DoxrstResult<Tables> {
	let mut tables = Tables::default();
	let mut persons: HashSet<String> = HashSet::new();
	let mut positions: HashSet<(String, Option<String>, Option<String>)> = HashSet::new();
	let mut parties: HashSet<(String, String)> = HashSet::new();

	for (index, record) in records.iter().enumerate() {
		let person = record
			.person
			.as_deref()
			.ok_or(DoxrstError::MissingPerson { index })?;
		let id = person_id(person).to_string();

		if persons.insert(id.clone()) {
			tables.persons.push(PersonRow {
				id: id.clone(),
				name: record.person_label.clone(),
				gender: record.gender_label.clone(),
				birth: record.birth.clone(),
				death: record.death.clone(),
			});
		}

		let position_key = (id.clone(), record.minister_label.clone(), record.start.clone());
		if positions.insert(position_key) {
			let until = record.end.clone().or_else(|| record.death.clone());

			if keeps_position(record.start.as_deref(), until.as_deref()) {
				tables.positions.push(PositionRow {
					id: id.clone(),
					position: record.minister_label.clone(),
					country: country.to_string(),
					start: record.start.clone().unwrap_or_default(),
					until,
				});
			}
		}

		if let Some(party) = &record.party_label {
			if parties.insert((id.clone(), party.clone())) {
				tables.parties.push(PartyRow {
					id,
					party: party.clone(),
				});
			}
		}
	}

	Ok(tables)
}

/// Write `{country}_person.csv`, `{country}_position.csv` and
/// `{country}_party.csv` into `out_dir`.
pub fn write_tables(tables: &Tables, out_dir: &Path, country: &str) -> DoxrstResult<ConvertSummary> {
	let person_file = out_dir.join(format!("{country}_person.csv"));
	let position_file = out_dir.join(format!("{country}_position.csv"));
	let party_file = out_dir.join(format!("{country}_party.csv"));

	write_csv(&person_file, &PERSON_HEADERS, &tables.persons)?;
	write_csv(&position_file, &POSITION_HEADERS, &tables.positions)?;
	write_csv(&party_file, &PARTY_HEADERS, &tables.parties)?;

	Ok(ConvertSummary {
		person_file,
		position_file,
		party_file,
		persons: tables.persons.len(),
		positions: tables.positions.len(),
		parties: tables.parties.len(),
	})
}

/// Read `json_path` and write the three tables for `country` into
/// `out_dir`.
pub fn convert(json_path: &Path, country: &str, out_dir: &Path) -> DoxrstResult<ConvertSummary> {
	let records = read_records(json_path)?;
	let tables = build_tables(&records, country)?;
	let summary = write_tables(&tables, out_dir, country)?;

	tracing::info!(
		records = records.len(),
		persons = summary.persons,
		positions = summary.positions,
		parties = summary.parties,
		"converted records"
	);

	Ok(summary)
}

fn write_csv<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> DoxrstResult<()> {
	let csv_error = |e: csv::Error| {
		DoxrstError::Csv {
			path: path.display().to_string(),
			reason: e.to_string(),
		}
	};

	let mut writer = csv::WriterBuilder::new()
		.has_headers(false)
		.terminator(csv::Terminator::CRLF)
		.from_path(path)
		.map_err(csv_error)?;

	writer.write_record(headers).map_err(csv_error)?;
	for row in rows {
		writer.serialize(row).map_err(csv_error)?;
	}
	writer.flush()?;

	Ok(())
}
