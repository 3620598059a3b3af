//! Stored queries derived from the base tables.
//!
//! Views are dropped and recreated on every migration, so consumers select columns by name.

/// Drop every view before recreating it.
pub(super) const DB_DROP_VIEWS: &str = "
DROP VIEW IF EXISTS v_tx_agg;
DROP VIEW IF EXISTS v_cosmos_messages;
DROP VIEW IF EXISTS v_tx_flattened;
";

/// One row per transaction, joined up to its test case.
pub(super) const DB_CREATE_TX_FLATTENED: &str = "
CREATE VIEW v_tx_flattened AS
SELECT
    test_case.id AS test_case_id,
    test_case.created_at AS test_case_created_at,
    test_case.name AS test_case_name,
    chain.id AS chain_kid,
    chain.chain_id AS chain_id,
    chain.chain_type AS chain_type,
    block.id AS block_id,
    block.created_at AS block_created_at,
    block.height AS block_height,
    tx.id AS tx_id,
    tx.data AS tx
FROM tx
LEFT JOIN block ON tx.fk_block_id = block.id
LEFT JOIN chain ON block.fk_chain_id = chain.id
LEFT JOIN test_case ON chain.fk_test_id = test_case.id;
";

/// One row per message object in `body.messages` of each Cosmos transaction.
///
/// The IBC identifiers are coalesced across the message shapes that carry them. Only string
/// values are taken; an identifier of any other JSON type reads as NULL. Packet ports and
/// channels map source to `port_id`/`channel_id` and destination to the counterparty columns.
pub(super) const DB_CREATE_COSMOS_MESSAGES: &str = r#"
CREATE VIEW v_cosmos_messages AS
SELECT
    flat.test_case_id,
    flat.test_case_created_at,
    flat.test_case_name,
    flat.chain_kid,
    flat.chain_id,
    flat.chain_type,
    flat.block_id,
    flat.block_created_at,
    flat.block_height,
    flat.tx_id,
    msg.key AS msg_n,
    CASE WHEN json_type(msg.value, '$."@type"') = 'text' THEN json_extract(msg.value, '$."@type"') END AS type,
    CASE WHEN json_type(msg.value, '$.client_state.chain_id') = 'text' THEN json_extract(msg.value, '$.client_state.chain_id') END AS client_chain_id,
    CASE WHEN json_type(msg.value, '$.client_id') = 'text' THEN json_extract(msg.value, '$.client_id') END AS client_id,
    CASE WHEN json_type(msg.value, '$.counterparty.client_id') = 'text' THEN json_extract(msg.value, '$.counterparty.client_id') END AS counterparty_client_id,
    CASE WHEN json_type(msg.value, '$.connection_id') = 'text' THEN json_extract(msg.value, '$.connection_id') END AS conn_id,
    COALESCE(
        CASE WHEN json_type(msg.value, '$.counterparty_connection_id') = 'text' THEN json_extract(msg.value, '$.counterparty_connection_id') END,
        CASE WHEN json_type(msg.value, '$.counterparty.connection_id') = 'text' THEN json_extract(msg.value, '$.counterparty.connection_id') END
    ) AS counterparty_conn_id,
    COALESCE(
        CASE WHEN json_type(msg.value, '$.port_id') = 'text' THEN json_extract(msg.value, '$.port_id') END,
        CASE WHEN json_type(msg.value, '$.source_port') = 'text' THEN json_extract(msg.value, '$.source_port') END,
        CASE WHEN json_type(msg.value, '$.packet.source_port') = 'text' THEN json_extract(msg.value, '$.packet.source_port') END
    ) AS port_id,
    COALESCE(
        CASE WHEN json_type(msg.value, '$.channel.counterparty.port_id') = 'text' THEN json_extract(msg.value, '$.channel.counterparty.port_id') END,
        CASE WHEN json_type(msg.value, '$.packet.destination_port') = 'text' THEN json_extract(msg.value, '$.packet.destination_port') END
    ) AS counterparty_port_id,
    COALESCE(
        CASE WHEN json_type(msg.value, '$.channel_id') = 'text' THEN json_extract(msg.value, '$.channel_id') END,
        CASE WHEN json_type(msg.value, '$.source_channel') = 'text' THEN json_extract(msg.value, '$.source_channel') END,
        CASE WHEN json_type(msg.value, '$.packet.source_channel') = 'text' THEN json_extract(msg.value, '$.packet.source_channel') END
    ) AS channel_id,
    COALESCE(
        CASE WHEN json_type(msg.value, '$.counterparty_channel_id') = 'text' THEN json_extract(msg.value, '$.counterparty_channel_id') END,
        CASE WHEN json_type(msg.value, '$.channel.counterparty.channel_id') = 'text' THEN json_extract(msg.value, '$.channel.counterparty.channel_id') END,
        CASE WHEN json_type(msg.value, '$.packet.destination_channel') = 'text' THEN json_extract(msg.value, '$.packet.destination_channel') END
    ) AS counterparty_channel_id,
    msg.value AS raw
FROM v_tx_flattened AS flat,
    json_each(
        CASE WHEN json_valid(flat.tx) THEN
            CASE WHEN json_type(flat.tx, '$.body.messages') = 'array' THEN flat.tx ELSE '{}' END
        ELSE '{}' END,
        '$.body.messages'
    ) AS msg
WHERE msg.type = 'object';
"#;

/// Max height and tx count per test case and chain.
pub(super) const DB_CREATE_TX_AGG: &str = "
CREATE VIEW v_tx_agg AS
SELECT
    test_case.id AS test_case_id,
    chain.id AS chain_kid,
    chain.chain_id AS chain_id,
    chain.chain_type AS chain_type,
    COALESCE(MAX(block.height), 0) AS chain_height,
    COUNT(tx.id) AS tx_total
FROM test_case
LEFT JOIN chain ON chain.fk_test_id = test_case.id
LEFT JOIN block ON block.fk_chain_id = chain.id
LEFT JOIN tx ON tx.fk_block_id = block.id
GROUP BY test_case.id, chain.id;
";
