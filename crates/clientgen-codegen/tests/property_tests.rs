//! Property-based tests for resolution, properties read-back and model
//! equality.

use clientgen_codegen::properties::read_back;
use clientgen_codegen::{Bindings, FileRole, FragmentResolver, Generator, TemplateLibrary};
use clientgen_core::flags::all_valid_flag_sets;
use clientgen_core::{ApiDescription, AuthConfig, ClientSettings};
use proptest::prelude::*;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::LazyLock;

const PETSTORE: &str = include_str!("fixtures/petstore.json");

static GENERATOR: LazyLock<Generator> = LazyLock::new(|| Generator::builtin().unwrap());
static PETSTORE_API: LazyLock<ApiDescription> =
    LazyLock::new(|| ApiDescription::from_json_str(PETSTORE).unwrap());

fn version_ids() -> Vec<String> {
    GENERATOR
        .matrix()
        .targets()
        .map(|t| t.id().to_string())
        .collect()
}

fn auth_config() -> impl Strategy<Value = AuthConfig> {
    let text = || proptest::option::of(any::<String>());
    (
        text(),
        text(),
        text(),
        text(),
        text(),
        text(),
        proptest::collection::vec(any::<String>(), 0..4),
    )
        .prop_map(
            |(base_url, token_url, client_id, client_secret, username, password, scopes)| {
                AuthConfig {
                    base_url,
                    token_url,
                    client_id,
                    client_secret,
                    username,
                    password,
                    scopes,
                }
            },
        )
}

proptest! {
    #[test]
    fn prop_generation_is_deterministic(
        index in 0usize..5,
        client_name in "svc[a-z0-9]{0,8}",
    ) {
        let versions = version_ids();
        let version = &versions[index % versions.len()];
        let settings = ClientSettings {
            client_name,
            ..ClientSettings::default()
        };

        let first = GENERATOR.run(version, &PETSTORE_API, &settings).unwrap();
        let second = GENERATOR.run(version, &PETSTORE_API, &settings).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn prop_auth_config_survives_properties_class(auth in auth_config()) {
        let settings = ClientSettings {
            auth: auth.clone(),
            ..ClientSettings::default()
        };
        let unit = GENERATOR
            .run("modern-5", &ApiDescription::default(), &settings)
            .unwrap();

        let back = read_back(&unit.text(FileRole::Properties)).unwrap();
        prop_assert_eq!(back, auth);
    }
}

#[test]
fn test_unit_fragments_resolve_identically_twice() {
    let library = TemplateLibrary::builtin().unwrap();
    let resolver = FragmentResolver::new(library.engine());
    let bindings = Bindings::new()
        .with("package", "com.acme.client.shop")
        .with("app_package", "com.acme")
        .with("application_class", "ShopApp")
        .with("header_prefix", "shopApp")
        .with("alert_header", "X-shopApp-alert")
        .with("params_header", "X-shopApp-params")
        .with("error_header", "X-shopApp-error")
        .with("header_prefix_literal", "\"shopApp\"")
        .with("alert_header_literal", "\"X-shopApp-alert\"")
        .with("params_header_literal", "\"X-shopApp-params\"")
        .with("error_header_literal", "\"X-shopApp-error\"")
        .overlay(&clientgen_codegen::properties::auth_bindings(&AuthConfig::default()));

    for role in FileRole::ALL {
        for fragment in library.fragments_for(role) {
            if fragment.scope != clientgen_codegen::FragmentScope::Unit {
                continue;
            }
            for flags in all_valid_flag_sets() {
                let a = resolver.resolve(fragment, &flags, &bindings).unwrap();
                let b = resolver.resolve(fragment, &flags, &bindings).unwrap();
                assert_eq!(a, b, "{}", fragment.qualified_name());
            }
        }
    }
}

/// Value-equality entity shaped like the generated `Pet` model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
struct PetModel {
    id: Option<i64>,
    name: Option<String>,
    photo_urls: Vec<String>,
    status: Option<String>,
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn mutate(pet: &mut PetModel, name: &str, photo: &str, status: &str) {
    pet.name = Some(name.to_string());
    pet.photo_urls = vec![photo.to_string()];
    pet.status = Some(status.to_string());
}

proptest! {
    #[test]
    fn prop_model_equality_is_value_based(
        name in any::<String>(),
        photo in any::<String>(),
        status in any::<String>(),
    ) {
        let mut first = PetModel::default();
        let mut second = PetModel::default();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(hash_of(&first), hash_of(&second));

        mutate(&mut second, &name, &photo, &status);
        prop_assert_ne!(&first, &second);
        prop_assert_ne!(&second, &first);
        prop_assert_eq!(&second, &second.clone());

        mutate(&mut first, &name, &photo, &status);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(hash_of(&first), hash_of(&second));
    }
}

#[test]
fn test_generated_equality_covers_every_field() {
    let unit = GENERATOR
        .run("modern-5", &PETSTORE_API, &ClientSettings::default())
        .unwrap();
    let pet = unit.file("Pet").unwrap();
    let entity = PETSTORE_API.entity("Pet").unwrap();

    for field in &entity.fields {
        let check = format!("Objects.equals(this.{0}, other.{0})", field.name);
        assert!(pet.content.contains(&check), "missing {check}");
    }

    let test = unit.text(FileRole::Test);
    assert!(test.contains("assertTrue(pet1.equals(pet2));"));
    assert!(test.contains("assertFalse(pet1.equals(pet2));"));
    assert!(test.contains("pet2.setName(\"name-mutated\");"));
    assert!(test.contains("pet1.setName(\"name-mutated\");"));
}
