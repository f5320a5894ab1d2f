use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One fully tokenised and padded training sample.
/// Both sides are <sos> tokens <eos> <pad>..., padded to a fixed length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationSample {
    pub source_ids: Vec<u32>,
    pub target_ids: Vec<u32>,
}

pub struct TranslationDataset {
    samples: Vec<TranslationSample>,
}

impl TranslationDataset {
    pub fn new(samples: Vec<TranslationSample>) -> Self {
        Self { samples }
    }
}

impl Dataset<TranslationSample> for TranslationDataset {
    fn get(&self, index: usize) -> Option<TranslationSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_len() {
        let dataset = TranslationDataset::new(vec![
            TranslationSample { source_ids: vec![2, 4, 3], target_ids: vec![2, 5, 3] },
            TranslationSample { source_ids: vec![2, 6, 3], target_ids: vec![2, 7, 3] },
        ]);

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.get(1).unwrap().target_ids, vec![2, 7, 3]);
        assert!(dataset.get(2).is_none());
    }
}
