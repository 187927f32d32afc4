use anyhow::{Result, anyhow};
use rand::Rng;
use snowflake::SnowflakeIdBucket;
use std::sync::{Arc, Mutex};

/// Source of deck ids: snowflake ids, or a fixed value for tests
#[derive(Clone)]
pub enum IdGenerator {
    Snowflake(Arc<Mutex<SnowflakeIdBucket>>),
    Fixed(i64),
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::with_random_node()
    }
}

impl IdGenerator {
    // node_id: only the lower 10 bits are used (5 bit machine id + 5 bit node id)
    pub fn with_node(node_id: u32) -> Self {
        let node = (node_id & Self::NODE_MASK) as i32;
        let bucket = SnowflakeIdBucket::new(node >> 5, node);
        Self::Snowflake(Arc::new(Mutex::new(bucket)))
    }

    pub fn with_random_node() -> Self {
        let node = rand::rng().random::<u32>() & Self::NODE_MASK;
        tracing::debug!("using random node num for id generator: {}", node);
        Self::with_node(node)
    }

    const NODE_MASK: u32 = (1 << 10) - 1;

    pub fn next_id(&self) -> Result<i64> {
        match self {
            Self::Snowflake(bucket) => bucket
                .lock()
                .map(|mut b| b.get_id())
                .map_err(|e| anyhow!("generate id error: {:?}", e)),
            Self::Fixed(id) => Ok(*id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use std::collections::HashSet;
    use tokio::task::JoinSet;

    #[test]
    fn test_fixed_id() {
        let generator = IdGenerator::Fixed(42);
        assert_eq!(generator.next_id().unwrap(), 42);
        assert_eq!(generator.next_id().unwrap(), 42);
    }

    #[test]
    fn test_ids_increase() {
        let generator = IdGenerator::with_node(3);
        let ids: Vec<i64> = (0..100).map(|_| generator.next_id().unwrap()).collect();
        assert!(ids.iter().tuple_windows().all(|(a, b)| a < b));
    }

    #[tokio::test]
    async fn test_unique_across_tasks() {
        let generator = IdGenerator::with_random_node();
        let mut set = JoinSet::new();
        for _ in 0..16 {
            let generator = generator.clone();
            set.spawn(async move {
                (0..500)
                    .map(|_| generator.next_id().unwrap())
                    .collect_vec()
            });
        }

        let mut ids = HashSet::<i64>::new();
        while let Some(res) = set.join_next().await {
            ids.extend(res.unwrap());
        }
        assert_eq!(ids.len(), 16 * 500);
    }
}
