//! Interactive text menus over a [`Registry`].
//!
//! The menu only reads input, calls the registry and prints what came back.
//! Rule violations are rendered as messages and never end the session; only
//! I/O failures propagate.

use crate::console::Console;
use crate::errors::{OwnerError, RegistryResult};
use crate::events::{EventBus, RegistryEvent};
use crate::owners::{Direction, OwnerId};
use crate::pokedex::DisplayOrder;
use crate::registry::Registry;
use std::io::{self, BufRead, Write};
use tracing::debug;

const MAIN_MENU: &str = "\n=== Main Menu ===\n\
1. New Pokedex\n\
2. Existing Pokedex\n\
3. Delete a Pokedex\n\
4. Merge Pokedexes\n\
5. Sort Owners by Name\n\
6. Print Owners in a direction X times\n\
7. Exit";

/// Outcome of one pass through a menu loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Leave,
}

pub struct Menu<R, W> {
    registry: Registry,
    console: Console<R, W>,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(registry: Registry, input: R, output: W) -> Self {
        Menu {
            registry,
            console: Console::new(input, output),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Hand back the registry and the writer once the session is over.
    pub fn into_parts(self) -> (Registry, W) {
        (self.registry, self.console.into_output())
    }

    /// Run the main menu until Exit is chosen or input runs out. Either way
    /// every owner is released before returning.
    pub fn run(&mut self) -> io::Result<()> {
        let result = self.main_loop();
        self.registry.release_all();
        match result {
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                debug!("input closed, leaving main menu");
                Ok(())
            }
            other => other,
        }
    }

    fn main_loop(&mut self) -> io::Result<()> {
        loop {
            self.console.say(MAIN_MENU)?;
            let choice = self.console.read_int("Your choice: ")?;
            let flow = match choice {
                1 => self.new_pokedex()?,
                2 => self.existing_pokedex()?,
                3 => self.delete_pokedex()?,
                4 => self.merge_pokedexes()?,
                5 => self.sort_owners()?,
                6 => self.print_owners_in_direction()?,
                7 => {
                    self.console.say("Goodbye!")?;
                    Flow::Leave
                }
                _ => {
                    self.console.say("Invalid.")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Leave {
                return Ok(());
            }
        }
    }

    fn new_pokedex(&mut self) -> io::Result<Flow> {
        let name = self.read_name("Your name: ")?;
        if self.registry.owners().contains_name(&name) {
            let err = OwnerError::DuplicateName(name);
            self.console.say(format!("{}.", err))?;
            return Ok(Flow::Continue);
        }

        let mut starters = String::from("Choose Starter:");
        for (index, entry) in self.registry.catalog().starters().iter().enumerate() {
            starters.push_str(&format!("\n{}. {}", index + 1, entry.name));
        }
        self.console.say(starters)?;
        let choice = self.console.read_int("Your choice: ")?;

        let result = self.registry.open_pokedex(&name, choice);
        self.report(result)?;
        Ok(Flow::Continue)
    }

    fn existing_pokedex(&mut self) -> io::Result<Flow> {
        if self.registry.owners().is_empty() {
            self.console.say("No existing Pokedexes.")?;
            return Ok(Flow::Continue);
        }
        self.console.say("\nExisting Pokedexes:")?;
        self.list_owners()?;
        let position = self.console.read_int("Choose a Pokedex by number: ")?;

        match self.registry.owner_at(position) {
            Ok(owner) => self.owner_menu(owner)?,
            Err(err) => self.console.say(format!("{}.", err))?,
        }
        Ok(Flow::Continue)
    }

    fn delete_pokedex(&mut self) -> io::Result<Flow> {
        if self.registry.owners().is_empty() {
            self.console.say("No existing Pokedexes to delete.")?;
            return Ok(Flow::Continue);
        }
        self.console.say("\n=== Delete a Pokedex ===")?;
        self.list_owners()?;
        let position = self
            .console
            .read_int("Choose a Pokedex to delete by number: ")?;

        let result = self.registry.delete_pokedex(position);
        self.report(result)?;
        Ok(Flow::Continue)
    }

    fn merge_pokedexes(&mut self) -> io::Result<Flow> {
        if self.registry.owners().len() < 2 {
            self.console.say("Not enough owners to merge.")?;
            return Ok(Flow::Continue);
        }
        self.console.say("\n=== Merge Pokedexes ===")?;
        let first = self.read_name("Enter name of first owner: ")?;
        let second = self.read_name("Enter name of second owner: ")?;
        self.console.say(format!("Merging {} and {}...", first, second))?;

        let result = self.registry.merge_pokedexes(&first, &second);
        self.report(result)?;
        Ok(Flow::Continue)
    }

    fn sort_owners(&mut self) -> io::Result<Flow> {
        if self.registry.owners().len() < 2 {
            self.console.say("0 or 1 owners only => no need to sort.")?;
            return Ok(Flow::Continue);
        }
        let result = self.registry.sort_owners();
        self.report(result)?;
        Ok(Flow::Continue)
    }

    fn print_owners_in_direction(&mut self) -> io::Result<Flow> {
        if self.registry.owners().is_empty() {
            self.console.say("No owners.")?;
            return Ok(Flow::Continue);
        }
        let direction = loop {
            let token = self.console.read_line("Enter direction (F or B): ")?;
            match token.parse::<Direction>() {
                Ok(direction) => break direction,
                Err(_) => self.console.say("Invalid direction, must be F or B.")?,
            }
        };
        let count = self.console.read_int("How many prints? ")?;

        match self.registry.owners_in_direction(direction, count) {
            Ok(names) => {
                for (step, name) in names.enumerate() {
                    self.console.say(format!("[{}] {}", step + 1, name))?;
                }
            }
            Err(err) => self.console.say(format!("{}.", err))?,
        }
        Ok(Flow::Continue)
    }

    fn owner_menu(&mut self, owner: OwnerId) -> io::Result<()> {
        let name = match self.registry.owner(owner) {
            Ok(entry) => entry.name.clone(),
            Err(err) => return self.console.say(format!("{}.", err)),
        };
        self.console.say(format!("\nEntering {}'s Pokedex...", name))?;

        loop {
            self.console.say(format!(
                "\n-- {}'s Pokedex Menu --\n\
                 1. Add Pokemon\n\
                 2. Display Pokedex\n\
                 3. Release Pokemon (by ID)\n\
                 4. Pokemon Fight!\n\
                 5. Evolve Pokemon\n\
                 6. Back to Main",
                name
            ))?;
            match self.console.read_int("Your choice: ")? {
                1 => {
                    let id = self.console.read_int("Enter ID to add: ")?;
                    let result = self.registry.add_pokemon(owner, id);
                    self.report(result)?;
                }
                2 => self.display_menu(owner)?,
                3 => {
                    if self.pokedex_is_empty(owner) {
                        self.console.say("No Pokemon to release.")?;
                        continue;
                    }
                    let id = self.console.read_int("Enter Pokemon ID to release: ")?;
                    let result = self.registry.release_pokemon(owner, id);
                    self.report(result)?;
                }
                4 => self.fight(owner)?,
                5 => {
                    if self.pokedex_is_empty(owner) {
                        self.console.say("Cannot evolve. Pokedex empty.")?;
                        continue;
                    }
                    let id = self.console.read_int("Enter ID of Pokemon to evolve: ")?;
                    let result = self.registry.evolve_pokemon(owner, id);
                    self.report(result)?;
                }
                6 => {
                    self.console.say("Back to Main Menu.")?;
                    return Ok(());
                }
                _ => self.console.say("Invalid choice.")?,
            }
        }
    }

    fn display_menu(&mut self, owner: OwnerId) -> io::Result<()> {
        if self.pokedex_is_empty(owner) {
            return self.console.say("Pokedex is empty.");
        }
        let mut menu = String::from("Display:");
        for (index, order) in DisplayOrder::ALL.iter().enumerate() {
            menu.push_str(&format!("\n{}. {}", index + 1, order.label()));
        }
        self.console.say(menu)?;

        let choice = self.console.read_int("Your choice: ")?;
        let Some(order) = DisplayOrder::from_choice(choice) else {
            return self.console.say("Invalid choice.");
        };
        match self.registry.listing(owner, order) {
            Ok(records) => {
                for record in records {
                    self.console.say(record)?;
                }
                Ok(())
            }
            Err(err) => self.console.say(format!("{}.", err)),
        }
    }

    fn fight(&mut self, owner: OwnerId) -> io::Result<()> {
        if self.pokedex_is_empty(owner) {
            return self.console.say("Pokedex is empty.");
        }
        let first = self.console.read_int("Enter ID of the first pokemon: ")?;
        let second = self.console.read_int("Enter ID of the second pokemon: ")?;
        let result = self
            .registry
            .fight(owner, first, second)
            .map(|report| EventBus::from(RegistryEvent::FightResolved(report)));
        self.report(result)
    }

    fn pokedex_is_empty(&self, owner: OwnerId) -> bool {
        self.registry
            .owner(owner)
            .map_or(true, |entry| entry.pokedex.is_empty())
    }

    /// Numbered owner list starting at head.
    fn list_owners(&mut self) -> io::Result<()> {
        let names: Vec<String> = self.registry.owners().iter().map(|o| o.name.clone()).collect();
        for (index, name) in names.iter().enumerate() {
            self.console.say(format!("{}. {}", index + 1, name))?;
        }
        Ok(())
    }

    fn read_name(&mut self, prompt: &str) -> io::Result<String> {
        loop {
            let name = self.console.read_line(prompt)?;
            if !name.is_empty() {
                return Ok(name);
            }
            self.console.say("Invalid input.")?;
        }
    }

    fn report(&mut self, result: RegistryResult<EventBus>) -> io::Result<()> {
        match result {
            Ok(events) => {
                for message in events.messages() {
                    self.console.say(message)?;
                }
                Ok(())
            }
            Err(err) => {
                debug!(error = %err, "operation rejected");
                self.console.say(format!("{}.", err))
            }
        }
    }
}
