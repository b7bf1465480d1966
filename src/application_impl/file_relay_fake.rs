use crate::domain_model::{DirectLink, SubjectId};
use crate::domain_port::{DeliveryError, FileRelay};
use crate::logger::*;
use std::sync::Mutex;

/// Minimal fake implementation for basic use only.
/// Records deliveries instead of performing them, so the pipeline can run
/// end to end without a chat transport.
#[derive(Debug, Default)]
pub struct FakeFileRelay {
    deliveries: Mutex<Vec<(SubjectId, DirectLink)>>,
}

impl FakeFileRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliveries(&self) -> Vec<(SubjectId, DirectLink)> {
        match self.deliveries.lock() {
            Ok(deliveries) => deliveries.clone(),
            Err(_) => Vec::new(),
        }
    }
}

#[async_trait::async_trait]
impl FileRelay for FakeFileRelay {
    async fn deliver(&self, subject: SubjectId, link: &DirectLink) -> Result<(), DeliveryError> {
        debug!("fake delivery of {} to {}", link, subject);
        self.deliveries
            .lock()
            .map_err(|_| DeliveryError::Send("delivery log poisoned".to_string()))?
            .push((subject, link.clone()));
        Ok(())
    }
}
