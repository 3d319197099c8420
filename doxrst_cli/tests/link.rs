mod common;

use doxrst_core::AnyEmptyResult;
use rstest::rstest;

#[rstest]
#[case::sql_remap(
	"src/provsql.sql",
	"https://github.com/PierreSenellart/provsql/blob/master/sql/provsql.sql#L42",
	"src/provsql.sql on line 42"
)]
#[case::plain_file(
	"src/provsql.c",
	"https://github.com/PierreSenellart/provsql/blob/master/src/provsql.c#L42",
	"src/provsql.c on line 42"
)]
fn link_prints_repository_url(
	#[case] file: &str,
	#[case] uri: &str,
	#[case] title: &str,
) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::doxrst_cmd()
		.arg("link")
		.arg(file)
		.arg("42")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(uri))
		.stdout(predicates::str::contains(format!("title: {title}")));

	Ok(())
}

#[test]
fn link_resolves_absolute_path_inside_repo_root() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("doxrst.toml"), "[source_link]\nrepo_root = \".\"\n")?;

	common::doxrst_cmd()
		.arg("link")
		.arg(tmp.path().join("src/provsql.sql"))
		.arg("7")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("sql/provsql.sql#L7"));

	Ok(())
}

#[test]
fn link_falls_back_to_anchor_outside_repo_root() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("doxrst.toml"), "[source_link]\nrepo_root = \".\"\n")?;

	common::doxrst_cmd()
		.arg("link")
		.arg("/nowhere/else.c")
		.arg("3")
		.arg("--id")
		.arg("else_8c")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("#else_8c"))
		.stdout(predicates::str::contains("internal:"));

	Ok(())
}

#[test]
fn link_json_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::doxrst_cmd()
		.arg("link")
		.arg("src/provsql.c")
		.arg("1")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("\"type\": \"external\""));

	Ok(())
}

#[test]
fn link_rejects_template_without_placeholders() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("doxrst.toml"),
		"[source_link]\nurl_template = \"https://example.com/{file_path}\"\n",
	)?;

	common::doxrst_cmd()
		.arg("link")
		.arg("src/provsql.c")
		.arg("1")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("invalid_template"));

	Ok(())
}
