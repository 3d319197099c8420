use std::path::Path;

use crate::config::Category;

/// A doxygen compound file with the usual surrounding noise, including a
/// member with its own nested `location`.
pub fn compound_xml(kind: &str, language: &str, name: &str, location: &str) -> String {
	format!(
		r#"<?xml version='1.0' encoding='UTF-8' standalone='no'?>
<doxygen xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:noNamespaceSchemaLocation="compound.xsd" version="1.9.8" xml:lang="en-US">
  <compounddef id="{id}" kind="{kind}" language="{language}">
    <compoundname>{name}</compoundname>
    <sectiondef kind="func">
      <memberdef kind="function" id="{id}_1a0" prot="public" static="no">
        <name>helper</name>
        <location file="/elsewhere/member.c" line="10" column="1"/>
      </memberdef>
    </sectiondef>
    <briefdescription>
    </briefdescription>
    <location file="{location}"/>
  </compounddef>
</doxygen>
"#,
		id = name.replace(|c: char| matches!(c, '/' | '.' | ':'), "_"),
	)
}

pub fn file_compound(name: &str) -> String {
	compound_xml("file", "C++", name, &format!("/home/user/provsql/src/{name}"))
}

pub fn write_xml(dir: &Path, file_name: &str, content: &str) {
	std::fs::write(dir.join(file_name), content)
		.unwrap_or_else(|e| panic!("write {file_name}: {e}"));
}

pub fn category(kind: &str, dir: &str, directive: &str) -> Category {
	Category {
		kind: kind.to_string(),
		dir: dir.to_string(),
		directive: directive.to_string(),
	}
}

pub fn file_category() -> Category {
	category("file", "files", "doxygenfile")
}
