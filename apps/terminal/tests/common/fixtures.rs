//! Test fixtures for unit files.

/// A unit with two words and one phrase, every example blanked.
pub const FRUIT_UNIT: &str = "english,chinese,examples
apple,n. 苹果,I ate an [[apple]] today.
pear,梨,A ripe [[pear]] fell.；Two [[pears]] were left.
give up,放弃,She [[gave up]] smoking.
";

/// A unit whose examples are missing or broken.
pub const ROUGH_UNIT: &str = "english,chinese,examples
plum,李,
fig,无花果,A [[fig tree.
";

/// Generate a unit file with `count` numbered words.
pub fn numbered_unit(count: usize) -> String {
    let mut content = String::from("english,chinese,examples\n");
    for i in 0..count {
        content.push_str(&format!("word{i},词{i},This is [[word{i}]].\n"));
    }
    content
}
