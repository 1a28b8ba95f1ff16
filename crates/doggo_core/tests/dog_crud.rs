use doggo_core::{
    AppConfig, ConnectionSource, Dog, DogRepository, Neighborhood, NeighborhoodRepository, Owner,
    OwnerId, OwnerRepository, SqliteDogRepository, SqliteNeighborhoodRepository,
    SqliteOwnerRepository, DEFAULT_CONNECTION,
};
use tempfile::TempDir;

fn setup() -> (TempDir, SqliteDogRepository, OwnerId, OwnerId) {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::default()
        .with_connection_string(DEFAULT_CONNECTION, dir.path().join("dogs.db").display().to_string());

    let neighborhoods = SqliteNeighborhoodRepository::new(&config).unwrap();
    let mut neighborhood = Neighborhood::new("Germantown");
    neighborhoods.add_neighborhood(&mut neighborhood).unwrap();

    let owners = SqliteOwnerRepository::new(&config).unwrap();
    let mut first = Owner::new("a@example.com", "A", "1 Elm", neighborhood.id, "555-0001");
    let mut second = Owner::new("b@example.com", "B", "2 Elm", neighborhood.id, "555-0002");
    owners.add_owner(&mut first).unwrap();
    owners.add_owner(&mut second).unwrap();

    let dogs = SqliteDogRepository::new(&config).unwrap();
    (dir, dogs, first.id, second.id)
}

#[test]
fn add_dog_writes_back_id_and_roundtrips_nullable_columns() {
    let (_dir, dogs, owner_id, _) = setup();

    let mut plain = Dog::new("Fido", "Beagle", owner_id);
    dogs.add_dog(&mut plain).unwrap();
    assert!(plain.id > 0);

    let mut detailed = Dog::new("Rex", "Boxer", owner_id);
    detailed.notes = Some("Afraid of thunder".to_string());
    detailed.image_url = Some("https://img.example.com/rex.jpg".to_string());
    dogs.add_dog(&mut detailed).unwrap();

    assert_eq!(dogs.get_dog_by_id(plain.id).unwrap(), Some(plain));
    assert_eq!(dogs.get_dog_by_id(detailed.id).unwrap(), Some(detailed));
    assert_eq!(dogs.get_dog_by_id(9_999).unwrap(), None);
}

#[test]
fn list_queries_are_ordered_and_filtered_by_owner() {
    let (_dir, dogs, first, second) = setup();
    let mut a = Dog::new("A", "Pug", first);
    let mut b = Dog::new("B", "Pug", second);
    let mut c = Dog::new("C", "Pug", first);
    for dog in [&mut a, &mut b, &mut c] {
        dogs.add_dog(dog).unwrap();
    }

    let all: Vec<_> = dogs
        .get_all_dogs()
        .unwrap()
        .into_iter()
        .map(|dog| dog.name)
        .collect();
    assert_eq!(all, ["A", "B", "C"]);

    let owned = dogs.get_dogs_by_owner_id(first).unwrap();
    assert_eq!(owned, vec![a, c]);
    assert!(dogs.get_dogs_by_owner_id(12_345).unwrap().is_empty());
}

#[test]
fn update_dog_can_clear_optional_fields_and_change_owner() {
    let (_dir, dogs, first, second) = setup();
    let mut dog = Dog::new("Rex", "Boxer", first);
    dog.notes = Some("Loud".to_string());
    dogs.add_dog(&mut dog).unwrap();

    dog.notes = None;
    dog.breed = "Boxer mix".to_string();
    dog.owner_id = second;
    dogs.update_dog(&dog).unwrap();

    assert_eq!(dogs.get_dog_by_id(dog.id).unwrap(), Some(dog.clone()));
    assert!(dogs.get_dogs_by_owner_id(first).unwrap().is_empty());
}

#[test]
fn update_dog_with_unknown_owner_is_rejected() {
    let (_dir, dogs, first, _) = setup();
    let mut dog = Dog::new("Rex", "Boxer", first);
    dogs.add_dog(&mut dog).unwrap();

    dog.owner_id = 777;
    let err = dogs.update_dog(&dog).unwrap_err();
    assert!(err.is_constraint_violation());
}

#[test]
fn delete_dog_removes_row_and_unblocks_owner_delete() {
    let dir = tempfile::tempdir().unwrap();
    let source = ConnectionSource::from_path(dir.path().join("shared.db"));
    let neighborhoods = SqliteNeighborhoodRepository::from_source(source.clone());
    let owners = SqliteOwnerRepository::from_source(source.clone());
    let dogs = SqliteDogRepository::from_source(source);

    let mut neighborhood = Neighborhood::new("Midtown");
    neighborhoods.add_neighborhood(&mut neighborhood).unwrap();
    let mut owner = Owner::new("c@example.com", "C", "3 Oak", neighborhood.id, "555-0003");
    owners.add_owner(&mut owner).unwrap();
    let mut dog = Dog::new("Spot", "Dalmatian", owner.id);
    dogs.add_dog(&mut dog).unwrap();

    assert!(owners.delete_owner(owner.id).is_err());

    dogs.delete_dog(dog.id).unwrap();
    assert_eq!(dogs.get_dog_by_id(dog.id).unwrap(), None);

    owners.delete_owner(owner.id).unwrap();
    assert!(owners.get_owner_by_id(owner.id).unwrap().is_none());
}

#[test]
fn neighborhoods_are_listed_in_insert_order() {
    let dir = tempfile::tempdir().unwrap();
    let repo =
        SqliteNeighborhoodRepository::from_source(ConnectionSource::from_path(dir.path().join("n.db")));

    assert!(repo.get_all_neighborhoods().unwrap().is_empty());

    let mut east = Neighborhood::new("East");
    let mut west = Neighborhood::new("West");
    repo.add_neighborhood(&mut east).unwrap();
    repo.add_neighborhood(&mut west).unwrap();

    assert_eq!(repo.get_all_neighborhoods().unwrap(), vec![east.clone(), west]);
    assert_eq!(repo.get_neighborhood_by_id(east.id).unwrap(), Some(east));
    assert_eq!(repo.get_neighborhood_by_id(404).unwrap(), None);
}
