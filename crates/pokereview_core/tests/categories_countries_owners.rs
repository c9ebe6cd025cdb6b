use pokereview_core::db::migrations::latest_version;
use pokereview_core::db::open_db_in_memory;
use pokereview_core::{
    Category, CategoryRepository, Country, CountryRepository, Owner, OwnerRepository, RepoError,
    Repositories, Repository, SqliteCategoryRepository,
};
use rusqlite::Connection;
use std::collections::BTreeSet;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

#[test]
fn category_names_are_unique_ignoring_case_and_whitespace() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();
    let categories = repos.categories();

    categories.create(&Category::new("Fire")).unwrap();
    let err = categories.create(&Category::new(" fire ")).unwrap_err();
    assert!(matches!(err, RepoError::Duplicate { entity: "category", .. }));
    categories.create(&Category::new("Water")).unwrap();

    let names: BTreeSet<String> = categories
        .get_all()
        .unwrap()
        .into_iter()
        .map(|category| category.name)
        .collect();
    assert_eq!(
        names,
        BTreeSet::from(["Fire".to_string(), "Water".to_string()])
    );
}

#[test]
fn duplicate_create_leaves_store_untouched() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();
    let countries = repos.countries();

    countries.create(&Country::new("Kanto")).unwrap();
    let before = countries.get_all().unwrap();

    countries.create(&Country::new("KANTO\n")).unwrap_err();

    assert_eq!(countries.get_all().unwrap(), before);
    assert_eq!(countries.count().unwrap(), 1);
}

#[test]
fn exists_tracks_create_and_delete() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();
    let categories = repos.categories();

    let id = categories.create(&Category::new("Grass")).unwrap();
    assert!(categories.exists(id).unwrap());

    let stored = categories.get_by_id(id).unwrap().unwrap();
    assert_eq!(stored, Category::with_id(id, "Grass"));

    categories.delete(&stored).unwrap();
    assert!(!categories.exists(id).unwrap());
    assert!(categories.get_by_id(id).unwrap().is_none());
}

#[test]
fn ids_are_not_reused_after_delete() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();
    let categories = repos.categories();

    let first = categories.create(&Category::new("Rock")).unwrap();
    categories.delete(&Category::with_id(first, "Rock")).unwrap();
    let second = categories.create(&Category::new("Rock")).unwrap();
    assert_ne!(first, second);
}

#[test]
fn update_replaces_full_record() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();
    let categories = repos.categories();

    let id = categories.create(&Category::new("Elektric")).unwrap();
    categories
        .update(&Category::with_id(id, "Electric"))
        .unwrap();

    assert_eq!(
        categories.get_by_id(id).unwrap().unwrap().name,
        "Electric"
    );
}

#[test]
fn update_and_delete_of_missing_row_return_not_found() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();
    let categories = repos.categories();

    let ghost = Category::with_id(404, "Ghost");
    assert!(matches!(
        categories.update(&ghost).unwrap_err(),
        RepoError::NotFound {
            entity: "category",
            id: 404
        }
    ));
    assert!(matches!(
        categories.delete(&ghost).unwrap_err(),
        RepoError::NotFound { id: 404, .. }
    ));
}

#[test]
fn blank_name_is_rejected_before_write() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();

    let err = repos.categories().create(&Category::new("   ")).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(repos.categories().count().unwrap(), 0);
}

#[test]
fn unmatched_category_yields_empty_pokemon_list() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();
    let categories = repos.categories();

    let id = categories.create(&Category::new("Dragon")).unwrap();
    assert!(categories.pokemon_by_category(id).unwrap().is_empty());
    assert!(categories.pokemon_by_category(9_999).unwrap().is_empty());
}

#[test]
fn owner_created_under_country_resolves_back_to_it() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();

    let kanto = repos.countries().create(&Country::new("Kanto")).unwrap();
    assert_eq!(kanto, 1);

    let ash = repos
        .owners()
        .create(&Owner::new("Ash", "Ketchum", kanto))
        .unwrap();
    let stored = repos.owners().get_by_id(ash).unwrap().unwrap();
    assert_eq!(stored.country_id, kanto);

    let country = repos.countries().country_by_owner(ash).unwrap().unwrap();
    assert_eq!(country, Country::with_id(kanto, "Kanto"));

    let owners = repos.countries().owners_by_country(kanto).unwrap();
    assert_eq!(owners, vec![stored]);
}

#[test]
fn country_by_unknown_owner_is_none() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();
    assert!(repos.countries().country_by_owner(77).unwrap().is_none());
    assert!(repos.countries().owners_by_country(77).unwrap().is_empty());
}

#[test]
fn owner_with_missing_country_is_rejected() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();

    let err = repos
        .owners()
        .create(&Owner::new("Gary", "Oak", 12))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::DanglingReference {
            entity: "country",
            id: 12
        }
    ));
    assert_eq!(repos.owners().count().unwrap(), 0);
}

#[test]
fn owner_last_name_uniqueness_ignores_first_name() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();
    let kanto = repos.countries().create(&Country::new("Kanto")).unwrap();

    repos
        .owners()
        .create(&Owner::new("Ash", "Ketchum", kanto))
        .unwrap();
    let err = repos
        .owners()
        .create(&Owner::new("Delia", " ketchum", kanto))
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate { entity: "owner", .. }));
}

#[test]
fn owner_update_with_missing_country_is_rejected() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();
    let kanto = repos.countries().create(&Country::new("Kanto")).unwrap();
    let id = repos
        .owners()
        .create(&Owner::new("Brock", "Harrison", kanto))
        .unwrap();

    let mut owner = repos.owners().get_by_id(id).unwrap().unwrap();
    owner.country_id = 500;
    let err = repos.owners().update(&owner).unwrap_err();
    assert!(matches!(err, RepoError::DanglingReference { id: 500, .. }));
    assert_eq!(
        repos.owners().get_by_id(id).unwrap().unwrap().country_id,
        kanto
    );
}

#[test]
fn deleting_country_cascades_to_its_owners() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();
    let johto = repos.countries().create(&Country::new("Johto")).unwrap();
    let owner = repos
        .owners()
        .create(&Owner::new("Ethan", "Gold", johto))
        .unwrap();

    repos
        .countries()
        .delete(&Country::with_id(johto, "Johto"))
        .unwrap();

    assert!(!repos.owners().exists(owner).unwrap());
    assert!(repos.owners().pokemon_by_owner(owner).unwrap().is_empty());
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteCategoryRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_missing_record_tables() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        Repositories::try_new(&conn),
        Err(RepoError::MissingRequiredTable("categories"))
    ));
}
