//! Integration tests with the catboost evaluator layout
//!
//! Runs the built-in manifest against a tree shaped like the catboost
//! evaluation library: a C++ public header, a C wrapper header, two internal
//! headers and two implementation units.

use amalgam_core::Config;
use amalgam_merge::{amalgamate, scan_undeclared, Pipeline};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CATBOOST_HPP: &str = r#"#pragma once

#include <string>
#include <vector>
#include <memory>

namespace catboost {
	class Model {
	public:
		Model();
		double apply(const std::vector<float>& features) const;
	};
}
"#;

const CB_H: &str = r#"#ifndef CB_H
#define CB_H
#include <ctype.h>
#include <string.h>

#ifdef __cplusplus
extern "C" {
#endif
void* cb_load_model(const char* filename);
#ifdef __cplusplus
}
#endif
#endif
"#;

const VEC4_HPP: &str = r#"#pragma once
#include <smmintrin.h>
#include <cstdint>
struct Vec4 { float v[4]; };
"#;

const JSON_HPP: &str = r#"#pragma once
#include <map>
namespace json { struct Value {}; }
"#;

const CATBOOST_CPP: &str = r#"#include "catboost.hpp"
#include "json.hpp"
#include <fstream>

#include "vec4.hpp"

namespace catboost {
	Model::Model() {}
}
"#;

const CB_CPP: &str = r#"#include <cb.h>
#include <catboost.hpp>
#include <limits>
#include <sstream>

void* cb_load_model(const char* filename) { return nullptr; }
"#;

fn catboost_tree() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    fs::create_dir_all(root.join("include")).unwrap();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::create_dir_all(root.join("unittest")).unwrap();

    fs::write(root.join("include/catboost.hpp"), CATBOOST_HPP).unwrap();
    fs::write(root.join("include/cb.h"), CB_H).unwrap();
    fs::write(root.join("src/vec4.hpp"), VEC4_HPP).unwrap();
    fs::write(root.join("src/json.hpp"), JSON_HPP).unwrap();
    fs::write(root.join("src/catboost.cpp"), CATBOOST_CPP).unwrap();
    fs::write(root.join("src/cb.cpp"), CB_CPP).unwrap();
    fs::write(root.join("unittest/catboost_test.cpp"), "int main() {}\n").unwrap();

    temp
}

fn builtin_at(root: &Path) -> Config {
    Config {
        project_root: root.to_path_buf(),
        ..Config::builtin()
    }
}

#[test]
fn test_catboost_header() {
    let temp = catboost_tree();
    let config = builtin_at(temp.path());

    let report = amalgamate(&config).unwrap();
    let header = fs::read_to_string(&report.header).unwrap();

    let expected = format!(
        "#pragma once\n\
         // This file is generated by amalgamate. Do not edit.\n\
         #ifdef __cplusplus\n\
         // FILE: include/catboost.hpp\n\
         {}\
         #endif // __cplusplus\n\
         // FILE: include/cb.h\n\
         {}",
        CATBOOST_HPP.trim_start_matches("#pragma once\n"),
        CB_H
    );
    assert_eq!(header, expected);
}

#[test]
fn test_catboost_source() {
    let temp = catboost_tree();
    let config = builtin_at(temp.path());

    let report = amalgamate(&config).unwrap();
    let source = fs::read_to_string(&report.source).unwrap();

    assert!(source.starts_with(
        "// This file is generated by amalgamate. Do not edit.\n#include \"catboost.h\"\n// FILE: src/vec4.hpp\n"
    ));
    assert!(source.contains("// #include \"catboost.hpp\"\n"));
    assert!(source.contains("// #include \"json.hpp\"\n"));
    assert!(source.contains("// #include \"vec4.hpp\"\n"));
    assert!(source.contains("// #include <cb.h>\n"));
    assert!(source.contains("// #include <catboost.hpp>\n"));
    assert!(source.contains("\n#include <fstream>\n"));
    assert!(source.contains("\n#include <smmintrin.h>\n"));
    assert!(!source.contains("#pragma once"));

    let order: Vec<usize> = ["src/vec4.hpp", "src/json.hpp", "src/catboost.cpp", "src/cb.cpp"]
        .iter()
        .map(|p| source.find(&format!("// FILE: {}\n", p)).unwrap())
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_catboost_report() {
    let temp = catboost_tree();
    let config = builtin_at(temp.path());

    let report = amalgamate(&config).unwrap();

    assert_eq!(report.registry_size, 4);
    assert_eq!(report.header_units.len(), 2);
    assert_eq!(report.source_units.len(), 4);
    assert_eq!(report.suppressed(), 5);
    assert_eq!(report.pragmas_stripped(), 3);
    assert!(report.unmatched().is_empty());
    assert!(report.header.ends_with("amalgamated/catboost.h"));
    assert!(report.source.ends_with("amalgamated/catboost.cpp"));
}

#[test]
fn test_catboost_missing_json() {
    let temp = catboost_tree();
    fs::remove_file(temp.path().join("src/json.hpp")).unwrap();
    let config = builtin_at(temp.path());

    let check = Pipeline::new(&config).check();
    assert_eq!(check.missing, vec![PathBuf::from("src/json.hpp")]);

    assert!(amalgamate(&config).is_err());
    assert!(!config.source_path().exists());
}

#[test]
fn test_catboost_scan() {
    let temp = catboost_tree();
    let config = builtin_at(temp.path());
    amalgamate(&config).unwrap();

    let undeclared = scan_undeclared(&config);
    assert_eq!(undeclared, vec![PathBuf::from("unittest/catboost_test.cpp")]);
}
