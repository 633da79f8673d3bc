//! Inbound request schemas. Routes not listed here only carry headers and
//! rely on the version policy.

use {
    super::{ensure, is_block_id, Schema},
    crate::{
        config::P2pConfig,
        message::{
            blocks::{GetBlocksRequest, GetCommonBlocksRequest, PostBlockRequest},
            consensus::{PostPrecommitRequest, PostPrevoteRequest, PostProposalRequest},
            transactions::PostTransactionsRequest,
        },
    },
    std::sync::Arc,
};

pub fn get_blocks(config: &P2pConfig) -> Schema<GetBlocksRequest> {
    let max_limit = config.max_download_blocks;
    Arc::new(move |request: &GetBlocksRequest| {
        ensure(request.from_height >= 1, || {
            format!("fromHeight must be >= 1, got {}", request.from_height)
        })?;
        ensure((1..=max_limit).contains(&request.limit), || {
            format!("limit must be in 1..={max_limit}, got {}", request.limit)
        })
    })
}

pub fn get_common_blocks(config: &P2pConfig) -> Schema<GetCommonBlocksRequest> {
    let max_ids = config.max_common_block_ids;
    Arc::new(move |request: &GetCommonBlocksRequest| {
        ensure((1..=max_ids).contains(&request.ids.len()), || {
            format!("ids must hold 1..={max_ids} entries, got {}", request.ids.len())
        })?;
        match request.ids.iter().position(|id| !is_block_id(id)) {
            Some(index) => Err(format!("ids[{index}] is not a block id")),
            None => Ok(()),
        }
    })
}

pub fn post_block() -> Schema<PostBlockRequest> {
    Arc::new(|request: &PostBlockRequest| {
        ensure(!request.block.is_empty(), || "block is empty".to_owned())
    })
}

pub fn post_precommit() -> Schema<PostPrecommitRequest> {
    Arc::new(|request: &PostPrecommitRequest| {
        ensure(!request.precommit.is_empty(), || "precommit is empty".to_owned())
    })
}

pub fn post_prevote() -> Schema<PostPrevoteRequest> {
    Arc::new(|request: &PostPrevoteRequest| {
        ensure(!request.prevote.is_empty(), || "prevote is empty".to_owned())
    })
}

pub fn post_proposal() -> Schema<PostProposalRequest> {
    Arc::new(|request: &PostProposalRequest| {
        ensure(!request.proposal.is_empty(), || "proposal is empty".to_owned())
    })
}

pub fn post_transactions(config: &P2pConfig) -> Schema<PostTransactionsRequest> {
    let max = config.max_transactions_per_request;
    Arc::new(move |request: &PostTransactionsRequest| {
        ensure(request.transactions.len() <= max, || {
            format!(
                "at most {max} transactions per request, got {}",
                request.transactions.len()
            )
        })
    })
}

#[cfg(test)]
mod tests {
    use {super::*, test_case::test_case};

    #[test_case(1, 1, true; "minimum")]
    #[test_case(1, 400, true; "maximum limit")]
    #[test_case(0, 10, false; "zero height")]
    #[test_case(5, 0, false; "zero limit")]
    #[test_case(5, 401, false; "limit too large")]
    fn test_get_blocks(from_height: u32, limit: u32, ok: bool) {
        let schema = get_blocks(&P2pConfig::default());
        let request = GetBlocksRequest {
            from_height,
            limit,
            headers: None,
        };
        assert_eq!(schema(&request).is_ok(), ok);
    }

    #[test]
    fn test_get_common_blocks() {
        let schema = get_common_blocks(&P2pConfig::default());
        let mut request = GetCommonBlocksRequest {
            ids: vec!["0f".repeat(32)],
            headers: None,
        };
        assert!(schema(&request).is_ok());

        request.ids = Vec::new();
        assert!(schema(&request).is_err());

        request.ids = vec!["0f".repeat(32); 11];
        assert!(schema(&request).is_err());

        request.ids = vec!["0f".repeat(32), "12345".to_owned()];
        assert_eq!(
            schema(&request).unwrap_err(),
            "ids[1] is not a block id".to_owned()
        );
    }

    #[test]
    fn test_non_empty_payloads() {
        assert!(post_block()(&PostBlockRequest::default()).is_err());
        assert!(post_precommit()(&PostPrecommitRequest::default()).is_err());
        assert!(post_prevote()(&PostPrevoteRequest::default()).is_err());
        assert!(post_proposal()(&PostProposalRequest::default()).is_err());

        let prevote = PostPrevoteRequest {
            prevote: vec![1],
            headers: None,
        };
        assert!(post_prevote()(&prevote).is_ok());
    }

    #[test]
    fn test_post_transactions_limit() {
        let schema = post_transactions(&P2pConfig::default());
        let mut request = PostTransactionsRequest {
            transactions: vec![vec![0u8]; 40],
            headers: None,
        };
        assert!(schema(&request).is_ok());
        request.transactions.push(vec![0u8]);
        assert!(schema(&request).is_err());
        request.transactions.clear();
        assert!(schema(&request).is_ok());
    }
}
