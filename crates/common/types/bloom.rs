use ethereum_types::{Bloom, BloomInput};

use crate::types::Log;

/// Bloom over the addresses and topics of `logs`.
pub fn bloom_from_logs(logs: &[Log]) -> Bloom {
    let mut bloom = Bloom::zero();
    for log in logs {
        accrue_log(&mut bloom, log);
    }
    bloom
}

pub fn accrue_log(bloom: &mut Bloom, log: &Log) {
    bloom.accrue(BloomInput::Raw(log.address.as_bytes()));
    for topic in log.topics.iter() {
        bloom.accrue(BloomInput::Raw(topic.as_bytes()));
    }
}
