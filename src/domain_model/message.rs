use crate::domain_model::SubjectId;

/// Text content of one inbound chat message plus its sender, as handed over
/// by the chat transport.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub sender: SubjectId,
    pub text: String,
}
