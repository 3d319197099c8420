#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;

pub fn doxrst_cmd() -> Command {
	let mut cmd = Command::cargo_bin("doxrst").expect("doxrst binary is built");
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

pub fn json2csv_cmd() -> Command {
	let mut cmd = Command::cargo_bin("json2csv").expect("json2csv binary is built");
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

pub fn compound_xml(kind: &str, language: &str, name: &str, location: &str) -> String {
	format!(
		r#"<?xml version='1.0' encoding='UTF-8' standalone='no'?>
<doxygen version="1.9.8" xml:lang="en-US">
  <compounddef id="{name}" kind="{kind}" language="{language}">
    <compoundname>{name}</compoundname>
    <location file="{location}"/>
  </compounddef>
</doxygen>
"#
	)
}

/// A project whose `doxrst.toml` reads `xml/` and writes `c/`, with two C
/// files, one class and one SQL file in the xml directory.
pub fn write_project(root: &Path, extra_config: &str) -> std::io::Result<()> {
	let xml = root.join("xml");
	std::fs::create_dir_all(&xml)?;

	std::fs::write(
		root.join("doxrst.toml"),
		format!("input = \"xml\"\noutput = \"c\"\n{extra_config}"),
	)?;
	std::fs::write(
		xml.join("provsql_8c.xml"),
		compound_xml("file", "C++", "provsql.c", "/home/user/provsql/src/provsql.c"),
	)?;
	std::fs::write(
		xml.join("semiring_2Boolean_8h.xml"),
		compound_xml(
			"file",
			"C++",
			"semiring/Boolean.h",
			"/home/user/provsql/src/semiring/Boolean.h",
		),
	)?;
	std::fs::write(
		xml.join("classBooleanCircuit.xml"),
		compound_xml(
			"class",
			"C++",
			"BooleanCircuit",
			"/home/user/provsql/src/BooleanCircuit.h",
		),
	)?;
	std::fs::write(
		xml.join("provsql_8sql.xml"),
		compound_xml("file", "SQL", "provsql.sql", "/home/user/provsql/src/provsql.sql"),
	)?;

	Ok(())
}
