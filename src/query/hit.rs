// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Inf and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, HashMap};

use crate::model::{Connection, Diagram, Node, NodeId, Point};

/// Pointer tolerance, in canvas pixels, for picking a connection line.
pub const DEFAULT_HIT_TOLERANCE: f64 = 10.0;

/// Resolves node ids to the node currently drawn for them.
pub trait NodeLookup {
    fn lookup_node(&self, node_id: NodeId) -> Option<&Node>;
}

impl NodeLookup for Diagram {
    fn lookup_node(&self, node_id: NodeId) -> Option<&Node> {
        self.node(node_id)
    }
}

impl NodeLookup for BTreeMap<NodeId, Node> {
    fn lookup_node(&self, node_id: NodeId) -> Option<&Node> {
        self.get(&node_id)
    }
}

impl NodeLookup for HashMap<NodeId, Node> {
    fn lookup_node(&self, node_id: NodeId) -> Option<&Node> {
        self.get(&node_id)
    }
}

/// Shortest distance from `point` to the segment `start..end`.
pub fn distance_to_point(point: Point, start: Point, end: Point) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return point.distance_to(start);
    }

    let t = (((point.x - start.x) * dx + (point.y - start.y) * dy) / length_sq).clamp(0.0, 1.0);
    point.distance_to(Point::new(start.x + t * dx, start.y + t * dy))
}

/// The visible line of a connection, from outline to outline.
///
/// `None` when either endpoint is missing from `nodes`.
pub fn connection_segment(
    connection: &Connection,
    nodes: &impl NodeLookup,
) -> Option<(Point, Point)> {
    let from = nodes.lookup_node(connection.from_id())?;
    let to = nodes.lookup_node(connection.to_id())?;
    let start = from.edge_point(to.center());
    let end = to.edge_point(from.center());
    Some((start, end))
}

/// Finds the topmost connection whose line passes within `tolerance` of `point`.
///
/// Connections are drawn in sequence order, so the search runs back to front and the last drawn
/// match wins. Connections with dangling endpoints are skipped.
pub fn find_connection_at_point<'a>(
    connections: &'a [Connection],
    nodes: &impl NodeLookup,
    point: Point,
    tolerance: f64,
) -> Option<&'a Connection> {
    connections.iter().rev().find(|connection| {
        connection_segment(connection, nodes)
            .is_some_and(|(start, end)| distance_to_point(point, start, end) <= tolerance)
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rstest::rstest;

    use super::{
        connection_segment, distance_to_point, find_connection_at_point, DEFAULT_HIT_TOLERANCE,
    };
    use crate::model::{
        fixtures, CanvasDefaults, Connection, ConnectionId, Diagram, Node, NodeId, Point,
    };

    const EPS: f64 = 1e-9;

    fn nodes(list: Vec<Node>) -> BTreeMap<NodeId, Node> {
        list.into_iter().map(|node| (node.id(), node)).collect()
    }

    fn conn(id: u64, from: u64, to: u64) -> Connection {
        Connection::new(ConnectionId::new(id), NodeId::new(from), NodeId::new(to))
    }

    #[rstest]
    #[case(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 0.0)]
    #[case(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 1.0)]
    #[case(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 0.37)]
    #[case(Point::new(-4.0, 3.0), Point::new(8.0, -6.0), 0.5)]
    #[case(Point::new(1.5, 2.5), Point::new(1.5, 99.0), 0.81)]
    fn distance_is_zero_on_the_segment(#[case] start: Point, #[case] end: Point, #[case] t: f64) {
        let on = Point::new(start.x + t * (end.x - start.x), start.y + t * (end.y - start.y));
        assert!(distance_to_point(on, start, end) < EPS);
    }

    #[rstest]
    #[case(Point::new(3.0, 4.0))]
    #[case(Point::new(-7.5, 0.25))]
    #[case(Point::new(2.0, 2.0))]
    fn degenerate_segment_uses_point_distance(#[case] query: Point) {
        let p = Point::new(2.0, 2.0);
        let d = distance_to_point(query, p, p);
        assert!((d - query.distance_to(p)).abs() < EPS);
        assert!(d.is_finite());
    }

    #[rstest]
    #[case(Point::new(5.0, 5.0))]
    #[case(Point::new(-3.0, 1.0))]
    #[case(Point::new(20.0, -2.0))]
    fn distance_is_symmetric_in_segment_endpoints(#[case] query: Point) {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 2.0);
        assert!((distance_to_point(query, a, b) - distance_to_point(query, b, a)).abs() < EPS);
    }

    #[test]
    fn distance_clamps_to_the_nearest_endpoint() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((distance_to_point(Point::new(13.0, 4.0), a, b) - 5.0).abs() < EPS);
        assert!((distance_to_point(Point::new(-3.0, -4.0), a, b) - 5.0).abs() < EPS);
        assert!((distance_to_point(Point::new(5.0, 7.0), a, b) - 7.0).abs() < EPS);
    }

    #[test]
    fn no_connections_means_no_match() {
        let lookup = nodes(vec![Node::rectangle(NodeId::new(1), 0.0, 0.0, 10.0, 10.0)]);
        assert!(find_connection_at_point(&[], &lookup, Point::new(5.0, 5.0), 10.0).is_none());
    }

    #[test]
    fn segment_runs_between_outlines_not_centers() {
        let lookup = nodes(vec![
            Node::rectangle(NodeId::new(1), 0.0, 0.0, 100.0, 50.0),
            Node::rectangle(NodeId::new(2), 300.0, 0.0, 100.0, 50.0),
        ]);
        let (start, end) = connection_segment(&conn(3, 1, 2), &lookup).expect("segment");
        assert!(start.distance_to(Point::new(100.0, 25.0)) < EPS);
        assert!(end.distance_to(Point::new(300.0, 25.0)) < EPS);
    }

    #[test]
    fn point_inside_source_node_does_not_hit_the_line() {
        let lookup = nodes(vec![
            Node::rectangle(NodeId::new(1), 0.0, 0.0, 100.0, 50.0),
            Node::rectangle(NodeId::new(2), 300.0, 0.0, 100.0, 50.0),
        ]);
        let connections = [conn(3, 1, 2)];
        // On the center line but well inside node 1, farther than the tolerance from its outline.
        let inside = Point::new(50.0, 25.0);
        assert!(find_connection_at_point(&connections, &lookup, inside, 10.0).is_none());
        let near = Point::new(200.0, 30.0);
        assert!(find_connection_at_point(&connections, &lookup, near, 10.0).is_some());
    }

    #[test]
    fn far_point_misses_every_connection() {
        let diagram = Diagram::from_document(fixtures::three_node_chain(), CanvasDefaults::default());
        let hit = find_connection_at_point(
            diagram.connections(),
            &diagram,
            Point::new(200.0, 400.0),
            DEFAULT_HIT_TOLERANCE,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn hit_within_tolerance_returns_that_connection() {
        let diagram = Diagram::from_document(fixtures::three_node_chain(), CanvasDefaults::default());
        let hit = find_connection_at_point(
            diagram.connections(),
            &diagram,
            Point::new(500.0, 32.0),
            DEFAULT_HIT_TOLERANCE,
        )
        .expect("hit");
        assert_eq!(hit.id(), ConnectionId::new(5));
    }

    #[test]
    fn overlapping_connections_resolve_to_the_last_drawn() {
        let lookup = nodes(vec![
            Node::rectangle(NodeId::new(1), 0.0, 0.0, 100.0, 50.0),
            Node::rectangle(NodeId::new(2), 300.0, 0.0, 100.0, 50.0),
        ]);
        let connections = [conn(3, 1, 2), conn(4, 2, 1)];
        let hit = find_connection_at_point(&connections, &lookup, Point::new(200.0, 25.0), 10.0)
            .expect("hit");
        assert_eq!(hit.id(), ConnectionId::new(4));
    }

    #[test]
    fn dangling_connections_are_skipped() {
        let lookup = nodes(vec![
            Node::rectangle(NodeId::new(1), 0.0, 0.0, 100.0, 50.0),
            Node::rectangle(NodeId::new(2), 300.0, 0.0, 100.0, 50.0),
        ]);
        // Drawn last but references a node that no longer exists.
        let connections = [conn(3, 1, 2), conn(4, 1, 99)];
        let hit = find_connection_at_point(&connections, &lookup, Point::new(200.0, 25.0), 10.0)
            .expect("hit");
        assert_eq!(hit.id(), ConnectionId::new(3));

        let only_dangling = [conn(4, 98, 99)];
        assert!(
            find_connection_at_point(&only_dangling, &lookup, Point::new(200.0, 25.0), 10.0)
                .is_none()
        );
    }
}
