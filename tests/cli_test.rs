mod common;

use assert_cmd::prelude::*;
use common::{Machine, STOCKED};
use predicates::prelude::*;

#[test]
fn test_list_shows_stocked_items_in_slot_order() {
    let machine = Machine::with_inventory(STOCKED);

    machine
        .command()
        .arg("list")
        .assert()
        .success()
        .stdout("slot,name,quantity,price\nA1,Chips,5,2.50\nC1,Candy,2,0.85\n");
}

#[test]
fn test_show_includes_empty_slot() {
    let machine = Machine::with_inventory(STOCKED);

    machine
        .command()
        .args(["show", "b1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("B1,Cola,0,1.75"));
}

#[test]
fn test_show_unknown_slot_fails() {
    let machine = Machine::with_inventory(STOCKED);

    machine
        .command()
        .args(["show", "Z9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid slot"));
}

#[test]
fn test_add_update_remove() -> Result<(), Box<dyn std::error::Error>> {
    let machine = Machine::with_inventory("");

    machine
        .command()
        .args(["add", "a1", "Chips", "2.5", "5"])
        .assert()
        .success();
    assert_eq!(machine.read(&machine.inventory()), "A1::Chips::5::2.50\n");

    machine
        .command()
        .args(["add", "A1", "Pretzels", "1.00", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate slot"));

    machine
        .command()
        .args(["update", "A1", "Chips", "2.75", "8", "--new-slot", "D4"])
        .assert()
        .success();
    assert_eq!(machine.read(&machine.inventory()), "D4::Chips::8::2.75\n");

    machine.command().args(["remove", "d4"]).assert().success();
    assert_eq!(machine.read(&machine.inventory()), "");

    machine
        .command()
        .args(["remove", "D4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid slot"));

    let audit = machine.read(&machine.audit());
    let lines: Vec<_> = audit.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with(" : Item A1 : Chips CREATED."));
    assert!(lines[1].ends_with(
        " : Item at A1: [Chips (5 in stock) : $2.50] UPDATED to: [Chips (8 in stock) : $2.75]"
    ));
    assert!(lines[2].ends_with(" : Item D4 : Chips DELETED."));

    Ok(())
}

#[test]
fn test_add_blank_name_rejected() {
    let machine = Machine::with_inventory("");

    machine
        .command()
        .args(["add", "A1", " ", "1.00", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid item"));
    assert_eq!(machine.read(&machine.inventory()), "");
}
