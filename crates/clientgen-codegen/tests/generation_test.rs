//! End-to-end generation of the pet store client.
//!
//! Runs the built-in matrix and template library over a small pet store API
//! and checks the rendered Java for the shapes each target version needs.

use clientgen_codegen::{FileRole, Generator, ResolvedUnit};
use clientgen_core::{ApiDescription, AuthConfig, ClientSettings, Error};

const PETSTORE: &str = include_str!("fixtures/petstore.json");

fn petstore() -> ApiDescription {
    ApiDescription::from_json_str(PETSTORE).unwrap()
}

fn generate(version: &str) -> ResolvedUnit {
    Generator::builtin()
        .unwrap()
        .run(version, &petstore(), &ClientSettings::default())
        .unwrap()
}

fn position(text: &str, needle: &str) -> usize {
    text.find(needle)
        .unwrap_or_else(|| panic!("'{needle}' not found in:\n{text}"))
}

#[test]
fn test_legacy_delete_expects_circuit_breaker_404() {
    let unit = generate("legacy-1");
    let test = unit.text(FileRole::Test);

    let delete = position(&test, "client.deletePet(null, fetched.getId());");
    let reread = position(&test[delete..], "client.getPetById(fetched.getId());") + delete;
    let catch = position(&test[reread..], "catch (HystrixRuntimeException e)") + reread;
    assert!(delete < reread && reread < catch);
    assert!(test[catch..].contains("e.getCause().getMessage().startsWith(\"status 404 \")"));

    assert!(!test.contains("FeignException"));
    assert!(test.contains("@RunWith(SpringJUnit4ClassRunner.class)"));
    assert!(test.contains("@SpringApplicationConfiguration(classes = Application.class)"));
    assert!(!test.contains("SpringRunner"));
}

#[test]
fn test_legacy_operations_raise_circuit_breaker() {
    let unit = generate("legacy-1");
    let ops = unit.text(FileRole::Operation);

    assert!(ops.contains("import org.springframework.cloud.netflix.feign.FeignClient;"));
    assert!(ops.contains(
        "ResponseEntity<Pet> getPetById(@PathVariable(\"petId\") Long petId) throws HystrixRuntimeException;"
    ));
    assert!(!ops.contains("FeignException"));
}

#[test]
fn test_legacy_skips_multipart_upload() {
    let unit = generate("legacy-1");
    let ops = unit.text(FileRole::Operation);
    let test = unit.text(FileRole::Test);

    assert!(!ops.contains("uploadFile"));
    assert!(!ops.contains("MultipartFile"));
    assert!(!test.contains("testUploadPetFile"));
    assert!(!test.contains("MockMultipartFile"));
}

#[test]
fn test_modern_delete_expects_declarative_404() {
    let unit = generate("modern-5");
    let test = unit.text(FileRole::Test);

    let delete = position(&test, "client.deletePet(null, fetched.getId());");
    let catch = position(&test[delete..], "catch (FeignException e)") + delete;
    assert!(test[catch..].contains("e.getMessage().startsWith(\"status 404 \")"));

    assert!(!test.contains("HystrixRuntimeException"));
    assert!(test.contains("@RunWith(SpringRunner.class)"));
    assert!(test.contains("@SpringBootTest(classes = Application.class)"));
}

#[test]
fn test_modern_emits_upload_method() {
    let unit = generate("modern-5");
    let ops = unit.text(FileRole::Operation);

    assert!(ops.contains("import org.springframework.cloud.openfeign.FeignClient;"));
    assert!(ops.contains("import org.springframework.web.multipart.MultipartFile;"));
    assert!(ops.contains("consumes = \"multipart/form-data\""));
    assert!(ops.contains(
        "ResponseEntity<Void> uploadFile(@PathVariable(\"petId\") Long petId, \
         @RequestParam(value = \"additionalMetadata\", required = false) String additionalMetadata, \
         @RequestPart(\"file\") MultipartFile file) throws FeignException;"
    ));

    let test = unit.text(FileRole::Test);
    assert!(test.contains("testUploadPetFile"));
    assert!(test.contains("client.uploadFile(pet.getId(), \"a test file\", filePart);"));
}

#[test]
fn test_test_and_operation_name_same_exception() {
    for (version, expected) in [
        ("legacy-1", "HystrixRuntimeException"),
        ("3.7.1", "HystrixRuntimeException"),
        ("5.0.0", "FeignException"),
        ("modern-5", "FeignException"),
    ] {
        let unit = generate(version);
        assert!(unit.text(FileRole::Operation).contains(&format!("throws {expected};")));
        assert!(unit.text(FileRole::Test).contains(&format!("catch ({expected} e)")));
    }
}

#[test]
fn test_crud_call_sequences() {
    let unit = generate("modern-5");
    let test = unit.text(FileRole::Test);

    assert!(test.contains("public void testCreateAndGetPet()"));
    assert!(test.contains("client.addPet(pet);"));
    assert!(test.contains("client.getPetById(pet.getId()).getBody();"));
    assert!(test.contains("client.updatePet(pet);"));
    assert!(test.contains("client.updatePetWithForm(fetched.getId(), \"name-updated\", null);"));
    assert!(test.contains("assertEquals(\"name-updated\", updated.getName());"));
    assert!(test.contains("pet.setName(\"name-mutated\");"));
    assert!(test.contains("public void testEqualsAndHashCode()"));
    assert!(test.contains("pet.setId(TestUtils.nextId());"));
}

#[test]
fn test_models_follow_references() {
    let unit = generate("modern-5");
    let models: Vec<&str> = unit
        .files_for(FileRole::Model)
        .map(|f| f.name.as_str())
        .collect();
    // Order is never referenced by an operation
    assert_eq!(models, ["Category", "Tag", "Pet"]);

    let pet = unit.file("Pet").unwrap();
    assert_eq!(pet.entity.as_deref(), Some("Pet"));
    assert!(pet.content.contains("private List<String> photoUrls = new ArrayList<String>();"));
    assert!(pet.content.contains("private Category category = null;"));
    assert!(pet.content.contains("return Objects.hash(id, category, name, photoUrls, tags, status);"));
}

#[test]
fn test_file_layout() {
    let unit = generate("modern-5");
    let names: Vec<(FileRole, &str)> = unit
        .files()
        .iter()
        .map(|f| (f.role, f.name.as_str()))
        .collect();
    assert_eq!(
        names,
        [
            (FileRole::Model, "Category"),
            (FileRole::Model, "Tag"),
            (FileRole::Model, "Pet"),
            (FileRole::Operation, "PetApiClient"),
            (FileRole::Properties, "ApiClientProperties"),
            (FileRole::Test, "TestUtils"),
            (FileRole::Test, "PetApiTest"),
            (FileRole::Support, "HeaderUtil"),
        ]
    );

    let client = unit.file("PetApiClient").unwrap();
    assert!(client.content.starts_with("package com.mycompany.myapp.client.petstore.api;"));
    assert!(client.content.trim_end().ends_with('}'));
    assert_eq!(client.content.matches("@RequestMapping").count(), 7);
}

#[test]
fn test_header_util_uses_target_prefix() {
    let legacy = generate("legacy-1");
    let support = legacy.text(FileRole::Support);
    assert!(support.contains("headers.add(\"X-jhipsterappApp-alert\", message);"));

    let modern = generate("modern-5");
    assert!(modern.text(FileRole::Support).contains("\"X-jhipsterApp-error\""));
}

#[test]
fn test_auth_defaults_reach_properties() {
    let settings = ClientSettings {
        auth: AuthConfig {
            client_id: Some("web_app".to_string()),
            scopes: vec!["read".to_string(), "write".to_string()],
            ..AuthConfig::default()
        },
        ..ClientSettings::default()
    };
    let unit = Generator::builtin()
        .unwrap()
        .run("modern-5", &petstore(), &settings)
        .unwrap();
    let text = unit.text(FileRole::Properties);

    assert!(text.contains("private String clientId = \"web_app\";"));
    assert!(text.contains("private String password = null;"));
    assert!(text.contains(
        "private List<String> scopes = new ArrayList<String>(Arrays.asList(\"read\", \"write\"));"
    ));
}

#[test]
fn test_unknown_entity_is_rejected() {
    let mut api = petstore();
    api.operations[0].entity = "Dog".to_string();

    let err = Generator::builtin()
        .unwrap()
        .run("modern-5", &api, &ClientSettings::default())
        .unwrap_err();
    assert!(matches!(err, Error::ValidationError { ref field, .. } if field == "operations[0].entity"));
}

#[test]
fn test_unknown_version_is_rejected() {
    let err = Generator::builtin()
        .unwrap()
        .run("v99", &petstore(), &ClientSettings::default())
        .unwrap_err();
    assert!(err.is_unknown_version());
    assert!(err.is_run_fatal());
}

#[test]
fn test_run_many_reports_each_version() {
    let generator = Generator::builtin().unwrap();
    let versions: Vec<String> = generator.matrix().targets().map(|t| t.id().to_string()).collect();
    let outcomes = generator.run_many(&versions, &petstore(), &ClientSettings::default());

    assert_eq!(outcomes.len(), versions.len());
    for outcome in &outcomes {
        let unit = outcome.result.as_ref().unwrap();
        assert_eq!(unit.target().id(), outcome.version);
    }
}

#[test]
fn test_query_found_after_update() {
    let unit = generate("modern-5");
    let test = unit.text(FileRole::Test);

    let method = position(&test, "public void testFindPetsByStatus()");
    let body = &test[method..];
    let update = position(body, "client.updatePet(pet);");
    let query = position(
        body,
        "List<Pet> found = client.findPetsByStatus(Arrays.asList(pet.getStatus())).getBody();",
    );
    assert!(update < query);
    assert!(body.contains("if (pet.getId().equals(candidate.getId())) {"));
    assert!(!test.contains("Ignore"));
    assert!(test.contains("    @Test\n    public void testFindPetsByStatus()"));
}

#[test]
fn test_legacy_query_test_is_ignored() {
    let unit = generate("2.27.2");
    let test = unit.text(FileRole::Test);

    assert!(test.contains("import org.junit.Ignore;"));
    assert!(test.contains("    @Ignore\n    @Test\n    public void testFindPetsByStatus()"));
    assert_eq!(test.matches("@Ignore").count(), 1);
}

#[test]
fn test_summary_may_name_other_exception() {
    let mut api = petstore();
    api.operations[0].summary =
        Some("Add a pet; retries are not attempted on FeignException".to_string());

    let unit = Generator::builtin()
        .unwrap()
        .run("legacy-1", &api, &ClientSettings::default())
        .unwrap();
    let ops = unit.text(FileRole::Operation);
    assert!(ops.contains("retries are not attempted on FeignException"));
    assert!(ops.contains("throws HystrixRuntimeException;"));
}

#[test]
fn test_quoted_path_stays_a_java_string() {
    let mut api = petstore();
    api.operations[0].path = "/pet/\"new\"".to_string();

    let unit = generate_api("modern-5", &api);
    assert!(
        unit.text(FileRole::Operation)
            .contains(r#"@RequestMapping(value = "/pet/\"new\"", method = RequestMethod.POST"#)
    );
}

fn generate_api(version: &str, api: &ApiDescription) -> ResolvedUnit {
    Generator::builtin()
        .unwrap()
        .run(version, api, &ClientSettings::default())
        .unwrap()
}
