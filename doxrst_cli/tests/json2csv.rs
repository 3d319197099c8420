mod common;

use doxrst_core::AnyEmptyResult;
use similar_asserts::assert_eq;

const RECORDS: &str = r#"[
  {
    "person": "http://www.wikidata.org/entity/Q42",
    "personLabel": "Alice",
    "genderLabel": "female",
    "birthISO": "1950-01-01",
    "ministerLabel": "Minister of Culture",
    "startISO": "1981-05-22",
    "endISO": "1986-03-20",
    "partyLabel": "PS"
  },
  {
    "person": "http://www.wikidata.org/entity/Q42",
    "personLabel": "Alice",
    "genderLabel": "female",
    "birthISO": "1950-01-01",
    "ministerLabel": "Minister of Youth",
    "startISO": "1940-01-01",
    "endISO": null,
    "partyLabel": "PS"
  },
  {
    "person": "http://www.wikidata.org/entity/Q7",
    "personLabel": "Bob",
    "genderLabel": "male",
    "birthISO": "1930-02-02",
    "deathISO": "2001-01-01",
    "ministerLabel": "Prime Minister",
    "startISO": "1995-05-17",
    "partyLabel": null
  }
]"#;

#[test]
fn converts_records_into_three_tables() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let json = tmp.path().join("data.json");
	std::fs::write(&json, RECORDS)?;

	common::json2csv_cmd()
		.arg(&json)
		.arg("FR")
		.arg("--out-dir")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("2 person(s)"));

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("FR_person.csv"))?,
		"id,name,gender,birth,death\r\n42,Alice,female,1950-01-01,\r\n7,Bob,male,1930-02-02,\
		 2001-01-01\r\n"
	);
	assert_eq!(
		std::fs::read_to_string(tmp.path().join("FR_position.csv"))?,
		"id,position,country,start,until\r\n42,Minister of \
		 Culture,FR,1981-05-22,1986-03-20\r\n7,Prime Minister,FR,1995-05-17,2001-01-01\r\n"
	);
	assert_eq!(
		std::fs::read_to_string(tmp.path().join("FR_party.csv"))?,
		"id,party\r\n42,PS\r\n"
	);

	Ok(())
}

#[test]
fn writes_into_working_directory_by_default() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("data.json"), RECORDS)?;

	common::json2csv_cmd()
		.current_dir(tmp.path())
		.arg("data.json")
		.arg("IT")
		.assert()
		.success();

	for table in ["IT_person.csv", "IT_position.csv", "IT_party.csv"] {
		assert!(tmp.path().join(table).exists(), "{table} missing");
	}

	Ok(())
}

#[test]
fn prints_usage_with_missing_arguments() {
	common::json2csv_cmd()
		.arg("data.json")
		.assert()
		.code(1)
		.stdout(predicates::str::contains("Usage: json2csv data.json CC"));
}

#[test]
fn ignores_arguments_after_country_code() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("data.json"), RECORDS)?;

	common::json2csv_cmd()
		.current_dir(tmp.path())
		.arg("data.json")
		.arg("FR")
		.arg("extra")
		.arg("more")
		.assert()
		.success();

	assert!(tmp.path().join("FR_party.csv").exists());

	Ok(())
}

#[test]
fn missing_person_is_fatal() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let json = tmp.path().join("data.json");
	std::fs::write(&json, r#"[{"person": "x/Q1"}, {"personLabel": "Nobody"}]"#)?;

	common::json2csv_cmd()
		.arg(&json)
		.arg("FR")
		.arg("--out-dir")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("missing_person"));

	Ok(())
}
