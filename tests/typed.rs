use std::collections::BTreeMap;
use std::io::Cursor;

use nested_query::{ErrorKind, ParseOptions, ValuelessBrackets};
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
struct Search {
    q: String,
    page: u32,
    exact: bool,
    #[serde(default)]
    tags: Vec<String>,
    sort: Option<String>,
    filters: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Roster {
    users: Vec<User>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct User {
    id: u64,
    name: String,
    #[serde(default)]
    friends: Vec<u64>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
enum Role {
    Admin,
    Member,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Member {
    role: Role,
    score: f64,
}

#[test]
fn search_form_from_str() {
    let search: Search = nested_query::from_str(
        "q=rust+lang&page=2&exact=on&tags[]=a&tags[]=b&filters[lang]=en&filters[year]=2024",
    )
    .expect("decode");
    assert_eq!(
        search,
        Search {
            q: "rust lang".to_string(),
            page: 2,
            exact: true,
            tags: vec!["a".to_string(), "b".to_string()],
            sort: None,
            filters: BTreeMap::from([
                ("lang".to_string(), "en".to_string()),
                ("year".to_string(), "2024".to_string()),
            ]),
        }
    );
}

#[test]
fn array_of_hashes_into_records() {
    let roster: Roster = nested_query::from_bytes(
        b"users[][id]=1&users[][name]=ross&users[][friends][]=2&users[][id]=2&users[][name]=chandler",
    )
    .expect("decode");
    assert_eq!(
        roster.users,
        vec![
            User {
                id: 1,
                name: "ross".to_string(),
                friends: vec![2],
            },
            User {
                id: 2,
                name: "chandler".to_string(),
                friends: vec![],
            },
        ]
    );
}

#[test]
fn lone_scalar_fills_a_sequence() {
    #[derive(Debug, Deserialize)]
    struct Tags {
        tags: Vec<String>,
    }
    let parsed: Tags = nested_query::from_str("tags=solo").expect("decode");
    assert_eq!(parsed.tags, vec!["solo".to_string()]);
}

#[test]
fn enums_and_floats() {
    let member: Member = nested_query::from_str("role=admin&score=4.5").expect("decode");
    assert_eq!(
        member,
        Member {
            role: Role::Admin,
            score: 4.5,
        }
    );
    let member: Member = nested_query::from_str("role=member&score=0").expect("decode");
    assert_eq!(member.role, Role::Member);
}

#[test]
fn reader_input() {
    let reader = Cursor::new(b"q=x&page=1&exact=false&filters[a]=b".to_vec());
    let search: Search = nested_query::from_reader(reader).expect("decode");
    assert_eq!(search.page, 1);
    assert!(!search.exact);
    assert!(search.tags.is_empty());
}

#[test]
fn options_reach_typed_decoding() {
    #[derive(Debug, Deserialize)]
    struct Flags {
        flags: Vec<String>,
    }
    assert_eq!(
        nested_query::from_str::<Flags>("flags[]")
            .expect_err("valueless")
            .kind(),
        ErrorKind::UnterminatedBracket
    );
    let options = ParseOptions::new().with_valueless_brackets(ValuelessBrackets::Empty);
    let flags: Flags = nested_query::from_str_with_options("flags[]", &options).expect("decode");
    assert_eq!(flags.flags, vec![String::new()]);
}

#[test]
fn bad_scalars_are_deserialize_errors() {
    let err = nested_query::from_str::<Member>("role=admin&score=lots").expect_err("bad float");
    assert_eq!(err.kind(), ErrorKind::Deserialize);
    assert!(err.to_string().contains("lots"), "{err}");

    let err = nested_query::from_str::<Member>("role=owner&score=1").expect_err("bad variant");
    assert_eq!(err.kind(), ErrorKind::Deserialize);
}

#[test]
fn parse_errors_surface_unchanged() {
    let err = nested_query::from_str::<Member>("role[]=1&role[x]=2").expect_err("conflict");
    assert_eq!(err.kind(), ErrorKind::TypeConflict);
}
