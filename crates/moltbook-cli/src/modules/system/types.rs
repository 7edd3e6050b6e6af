use moltbook_core::MoltbookClient;

pub struct CommandContext<'a> {
    pub client: &'a MoltbookClient,
}
