use pokedex_registry::{Menu, Registry};
use std::io::Cursor;

/// Feed `lines` to a fresh menu and return what it printed.
fn play(lines: &[&str]) -> String {
    let registry = Registry::with_builtin_catalog().unwrap();
    let mut script = lines.join("\n");
    script.push('\n');
    let mut menu = Menu::new(registry, Cursor::new(script), Vec::new());
    menu.run().unwrap();
    let (registry, output) = menu.into_parts();
    assert!(registry.owners().is_empty(), "session must release every owner");
    String::from_utf8(output).unwrap()
}

fn new_owner<'a>(name: &'a str, starter: &'a str) -> [&'a str; 3] {
    ["1", name, starter]
}

#[test]
fn test_create_add_evolve_and_display() {
    let mut script = Vec::new();
    script.extend(new_owner("Ash", "1"));
    script.extend([
        "2", "1", // enter Ash's pokedex
        "1", "25", // add Pikachu
        "1", "25", // duplicate
        "5", "1", // Bulbasaur -> Ivysaur
        "2", "1", // BFS listing
        "6", "7",
    ]);
    let output = play(&script);

    assert!(output.contains("New Pokedex created for Ash with starter Bulbasaur."));
    assert!(output.contains("Entering Ash's Pokedex..."));
    assert!(output.contains("Pokemon Pikachu (ID 25) added."));
    assert!(output.contains("Pokemon with ID 25 is already in the Pokedex."));
    assert!(output.contains("Pokemon evolved from Bulbasaur (ID 1) to Ivysaur (ID 2)."));
    assert!(output.contains("ID: 2, Name: Ivysaur, Type: GRASS, HP: 60, Attack: 62, Can Evolve: Yes"));
    assert!(output.ends_with("Goodbye!\n"));
}

#[test]
fn test_fight_reports_scores() {
    let mut script = Vec::new();
    script.extend(new_owner("Ash", "2"));
    script.extend(["2", "1", "1", "143", "4", "4", "143", "4", "4", "99", "6", "7"]);
    let output = play(&script);

    assert!(output.contains("Pokemon 1: Charmander (Score = 124.80)"));
    assert!(output.contains("Pokemon 2: Snorlax (Score = 357.00)"));
    assert!(output.contains("Snorlax wins!"));
    assert!(output.contains("No Pokemon with ID 99 found."));
}

#[test]
fn test_release_until_empty() {
    let mut script = Vec::new();
    script.extend(new_owner("Misty", "3"));
    script.extend(["2", "1", "3", "7", "3", "2", "5", "4", "6", "7"]);
    let output = play(&script);

    assert!(output.contains("Removing Pokemon Squirtle (ID 7)."));
    assert!(output.contains("No Pokemon to release."));
    assert!(output.contains("Pokedex is empty."));
    assert!(output.contains("Cannot evolve. Pokedex empty."));
}

#[test]
fn test_merge_sort_delete_and_walk() {
    let mut script = Vec::new();
    script.extend(new_owner("Misty", "3"));
    script.extend(new_owner("Brock", "2"));
    script.extend(new_owner("Ash", "1"));
    script.extend([
        "2", "1", "1", "120", "6", // Misty adds Staryu
        "5", // sort
        "6", "F", "4", // walk forward
        "4", "Ash", "Misty", // merge Misty into Ash
        "6", "b", "3", // walk backward
        "3", "2", // delete Brock (Ash, Brock after merge)
        "6", "forward", "2",
        "7",
    ]);
    let output = play(&script);

    assert!(output.contains("Owners sorted by name."));
    assert!(output.contains("[1] Ash\n[2] Brock\n[3] Misty\n[4] Ash\n"));
    assert!(output.contains("Staryu (ID 120) joins Ash."));
    assert!(output.contains("Owner 'Misty' has been removed after merging."));
    assert!(output.contains("[1] Ash\n[2] Brock\n[3] Ash\n"));
    assert!(output.contains("Deleting Brock's entire Pokedex..."));
    assert!(output.contains("[1] Ash\n[2] Ash\n"));
}

#[test]
fn test_rejected_inputs_keep_the_session_alive() {
    let mut script = Vec::new();
    script.extend(new_owner("Ash", "1"));
    script.extend(["1", "Ash"]); // duplicate owner
    script.extend(new_owner("Gary", "9")); // bad starter
    script.extend(["2", "5"]); // no such position
    script.extend(["6", "sideways", "B", "1"]);
    script.extend(["4", "7"]); // only one owner
    let output = play(&script);

    assert!(output.contains("Owner 'Ash' already exists."));
    assert!(output.contains("Invalid choice 9, expected 1-3."));
    assert!(output.contains("Invalid choice 5, expected 1-1."));
    assert!(output.contains("Invalid direction, must be F or B."));
    assert!(output.contains("Not enough owners to merge."));
}
