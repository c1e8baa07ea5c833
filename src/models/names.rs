use crate::models::Group;

const GROUP_A_NAMES: [&str; 10] = [
    "James", "John", "Robert", "Michael", "William", "David", "Richard", "Charles", "Joseph",
    "Thomas",
];

const GROUP_B_NAMES: [&str; 10] = [
    "Mary", "Patricia", "Linda", "Barbara", "Elizabeth", "Jennifer", "Maria", "Susan", "Margaret",
    "Dorothy",
];

/// Display name for the participant at `index` in `group`
///
/// Names are numbered from 1 so the suffix keeps them unique within a group.
pub fn participant_name(group: Group, index: usize) -> String {
    let ordinal = index + 1;
    let names = match group {
        Group::A => &GROUP_A_NAMES,
        Group::B => &GROUP_B_NAMES,
    };
    format!("{}{}", names[ordinal % names.len()], ordinal)
}
