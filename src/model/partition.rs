use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    Train,
    Test,
}

impl Partition {
    pub fn all() -> [Partition; 2] {
        [Partition::Train, Partition::Test]
    }

    pub fn title(self) -> &'static str {
        match self {
            Partition::Train => "Train-Data",
            Partition::Test => "Test-Data",
        }
    }
}
