use pokereview_core::db::open_db_in_memory;
use pokereview_core::{
    Category, CategoryId, CategoryRepository, Country, Owner, OwnerId, OwnerRepository, Pokemon,
    PokemonDraft, PokemonRepository, RepoError, Repositories, Repository, Review, Reviewer,
    ReviewRepository,
};
use rusqlite::Connection;

const BIRTH_DATE_MS: i64 = 850_003_200_000;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn seed_owner_and_category(repos: &Repositories<'_>) -> (OwnerId, CategoryId) {
    let kanto = repos.countries().create(&Country::new("Kanto")).unwrap();
    let owner = repos
        .owners()
        .create(&Owner::new("Ash", "Ketchum", kanto))
        .unwrap();
    let category = repos.categories().create(&Category::new("Electric")).unwrap();
    (owner, category)
}

fn junction_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn create_links_pokemon_to_owner_and_category() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();
    let (owner, category) = seed_owner_and_category(&repos);

    let pikachu = repos
        .pokemon()
        .create(&PokemonDraft::new(
            Pokemon::new("Pikachu", BIRTH_DATE_MS),
            owner,
            category,
        ))
        .unwrap();

    let stored = repos.pokemon().get_by_id(pikachu).unwrap().unwrap();
    assert_eq!(stored, Pokemon::with_id(pikachu, "Pikachu", BIRTH_DATE_MS));
    assert_eq!(repos.owners().pokemon_by_owner(owner).unwrap(), vec![stored.clone()]);
    assert_eq!(
        repos.categories().pokemon_by_category(category).unwrap(),
        vec![stored]
    );
    let owners = repos.owners().owners_of_pokemon(pikachu).unwrap();
    assert_eq!(owners.len(), 1);
    assert_eq!(owners[0].id, owner);
}

#[test]
fn create_with_missing_owner_writes_nothing() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();
    let (_, category) = seed_owner_and_category(&repos);

    let err = repos
        .pokemon()
        .create(&PokemonDraft::new(
            Pokemon::new("Eevee", BIRTH_DATE_MS),
            999,
            category,
        ))
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::DanglingReference {
            entity: "owner",
            id: 999
        }
    ));
    assert_eq!(repos.pokemon().count().unwrap(), 0);
    assert_eq!(junction_rows(&conn, "pokemon_owners"), 0);
    assert_eq!(junction_rows(&conn, "pokemon_categories"), 0);
}

#[test]
fn create_with_missing_category_writes_nothing() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();
    let (owner, _) = seed_owner_and_category(&repos);

    let err = repos
        .pokemon()
        .create(&PokemonDraft::new(
            Pokemon::new("Eevee", BIRTH_DATE_MS),
            owner,
            321,
        ))
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::DanglingReference {
            entity: "category",
            id: 321
        }
    ));
    assert_eq!(repos.pokemon().count().unwrap(), 0);
    assert_eq!(junction_rows(&conn, "pokemon_owners"), 0);
}

#[test]
fn duplicate_pokemon_name_is_rejected() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();
    let (owner, category) = seed_owner_and_category(&repos);

    repos
        .pokemon()
        .create(&PokemonDraft::new(
            Pokemon::new("Pikachu", BIRTH_DATE_MS),
            owner,
            category,
        ))
        .unwrap();
    let err = repos
        .pokemon()
        .create(&PokemonDraft::new(
            Pokemon::new("  PIKACHU", 0),
            owner,
            category,
        ))
        .unwrap_err();

    assert!(matches!(err, RepoError::Duplicate { entity: "pokemon", .. }));
    assert_eq!(junction_rows(&conn, "pokemon_owners"), 1);
}

#[test]
fn get_by_name_ignores_case_and_whitespace() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();
    let (owner, category) = seed_owner_and_category(&repos);
    let id = repos
        .pokemon()
        .create(&PokemonDraft::new(
            Pokemon::new("Raichu", BIRTH_DATE_MS),
            owner,
            category,
        ))
        .unwrap();

    assert_eq!(
        repos.pokemon().get_by_name(" raichu ").unwrap().unwrap().id,
        id
    );
    assert!(repos.pokemon().get_by_name("Mew").unwrap().is_none());
}

#[test]
fn plain_update_keeps_associations() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();
    let (owner, category) = seed_owner_and_category(&repos);
    let id = repos
        .pokemon()
        .create(&PokemonDraft::new(
            Pokemon::new("Pichu", BIRTH_DATE_MS),
            owner,
            category,
        ))
        .unwrap();

    repos
        .pokemon()
        .update(&Pokemon::with_id(id, "Pichu Jr", BIRTH_DATE_MS + 1))
        .unwrap();

    let linked = repos.owners().pokemon_by_owner(owner).unwrap();
    assert_eq!(linked, vec![Pokemon::with_id(id, "Pichu Jr", BIRTH_DATE_MS + 1)]);
    assert_eq!(
        repos.categories().pokemon_by_category(category).unwrap().len(),
        1
    );
}

#[test]
fn update_with_associations_replaces_links() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();
    let (ash, electric) = seed_owner_and_category(&repos);
    let kanto = repos.owners().get_by_id(ash).unwrap().unwrap().country_id;
    let misty = repos
        .owners()
        .create(&Owner::new("Misty", "Waterflower", kanto))
        .unwrap();
    let water = repos.categories().create(&Category::new("Water")).unwrap();

    let id = repos
        .pokemon()
        .create(&PokemonDraft::new(
            Pokemon::new("Psyduck", BIRTH_DATE_MS),
            ash,
            electric,
        ))
        .unwrap();

    repos
        .pokemon()
        .update_with_associations(misty, water, &Pokemon::with_id(id, "Psyduck", BIRTH_DATE_MS))
        .unwrap();

    assert!(repos.owners().pokemon_by_owner(ash).unwrap().is_empty());
    assert!(repos
        .categories()
        .pokemon_by_category(electric)
        .unwrap()
        .is_empty());
    assert_eq!(repos.owners().pokemon_by_owner(misty).unwrap().len(), 1);
    assert_eq!(
        repos.categories().pokemon_by_category(water).unwrap().len(),
        1
    );
    assert_eq!(junction_rows(&conn, "pokemon_owners"), 1);
    assert_eq!(junction_rows(&conn, "pokemon_categories"), 1);
}

#[test]
fn update_with_missing_owner_keeps_previous_links() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();
    let (owner, category) = seed_owner_and_category(&repos);
    let id = repos
        .pokemon()
        .create(&PokemonDraft::new(
            Pokemon::new("Snorlax", BIRTH_DATE_MS),
            owner,
            category,
        ))
        .unwrap();

    let err = repos
        .pokemon()
        .update_with_associations(555, category, &Pokemon::with_id(id, "Snorlax II", 0))
        .unwrap_err();

    assert!(matches!(err, RepoError::DanglingReference { id: 555, .. }));
    assert_eq!(
        repos.pokemon().get_by_id(id).unwrap().unwrap().name,
        "Snorlax"
    );
    assert_eq!(repos.owners().pokemon_by_owner(owner).unwrap().len(), 1);
}

#[test]
fn update_with_associations_of_missing_pokemon_is_not_found() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();
    let (owner, category) = seed_owner_and_category(&repos);

    let err = repos
        .pokemon()
        .update_with_associations(owner, category, &Pokemon::with_id(88, "Missingno", 0))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: "pokemon",
            id: 88
        }
    ));
    assert_eq!(junction_rows(&conn, "pokemon_owners"), 0);
}

#[test]
fn deleting_pokemon_cascades_to_links_and_reviews() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();
    let (owner, category) = seed_owner_and_category(&repos);
    let id = repos
        .pokemon()
        .create(&PokemonDraft::new(
            Pokemon::new("Jigglypuff", BIRTH_DATE_MS),
            owner,
            category,
        ))
        .unwrap();
    let reviewer = repos
        .reviewers()
        .create(&Reviewer::new("Samuel", "Oak"))
        .unwrap();
    repos
        .reviews()
        .create(&Review::new("Sleepy", "Sings everyone to sleep", 4, id, reviewer))
        .unwrap();

    let stored = repos.pokemon().get_by_id(id).unwrap().unwrap();
    repos.pokemon().delete(&stored).unwrap();

    assert_eq!(junction_rows(&conn, "pokemon_owners"), 0);
    assert_eq!(junction_rows(&conn, "pokemon_categories"), 0);
    assert!(repos.reviews().reviews_for_pokemon(id).unwrap().is_empty());
    assert_eq!(repos.reviews().count().unwrap(), 0);
    assert!(repos.owners().exists(owner).unwrap());
    assert!(repos.categories().exists(category).unwrap());
}

#[test]
fn deleting_owner_removes_only_its_links() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();
    let (owner, category) = seed_owner_and_category(&repos);
    let id = repos
        .pokemon()
        .create(&PokemonDraft::new(
            Pokemon::new("Bulbasaur", BIRTH_DATE_MS),
            owner,
            category,
        ))
        .unwrap();

    let stored_owner = repos.owners().get_by_id(owner).unwrap().unwrap();
    repos.owners().delete(&stored_owner).unwrap();

    assert!(repos.pokemon().exists(id).unwrap());
    assert!(repos.owners().owners_of_pokemon(id).unwrap().is_empty());
    assert_eq!(junction_rows(&conn, "pokemon_categories"), 1);
}

#[test]
fn rating_is_review_average_or_zero() {
    let conn = setup();
    let repos = Repositories::try_new(&conn).unwrap();
    let (owner, category) = seed_owner_and_category(&repos);
    let id = repos
        .pokemon()
        .create(&PokemonDraft::new(
            Pokemon::new("Charmander", BIRTH_DATE_MS),
            owner,
            category,
        ))
        .unwrap();

    assert_eq!(repos.pokemon().rating(id).unwrap(), 0.0);

    let reviewer = repos
        .reviewers()
        .create(&Reviewer::new("Gary", "Oak"))
        .unwrap();
    repos
        .reviews()
        .create(&Review::new("Hot", "Tail flame stays lit", 5, id, reviewer))
        .unwrap();
    repos
        .reviews()
        .create(&Review::new("Moody", "Hard to train", 2, id, reviewer))
        .unwrap();

    assert_eq!(repos.pokemon().rating(id).unwrap(), 3.5);
}
