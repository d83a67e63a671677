// used for the catalog store
use roaring::RoaringTreemap;
use rusqlite::{Connection, OptionalExtension, Params, Statement, params};

use crate::error::Result;

/// An opaque, totally ordered identifier for one catalog record (a gene cluster).
pub type RecordId = u64;

/// The taxonomic lineage attached to a sequence record. All ranks are plain
/// strings; missing ranks stay empty.
#[derive(Debug, Default, Clone)]
pub struct Lineage {
    pub superkingdom: String,
    pub phylum: String,
    pub class: String,
    pub taxonomic_order: String,
    pub family: String,
    pub genus: String,
    pub species: String,
    pub strain: String,
}

/// Paired labels/counts as returned by the grouped-count queries.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
pub struct GroupedCounts {
    pub labels: Vec<String>,
    pub data: Vec<u64>,
}

// ------------- Catalog -------------
/// The catalog store: owns the SQLite schema and the prepared statements for
/// loading records and probing terms during classification. Searches that
/// need dynamically built SQL (category lookups, grouped counts, prefix
/// queries) are prepared per call instead.
pub struct Catalog<'db> {
    pub db: &'db Connection,
    // Loaders
    add_taxon: Statement<'db>,
    add_sequence: Statement<'db>,
    add_cluster: Statement<'db>,
    add_cluster_type: Statement<'db>,
    assign_cluster_type: Statement<'db>,
    add_compound: Statement<'db>,
    add_monomer: Statement<'db>,
    assign_monomer: Statement<'db>,
    // Classification probes, each returning the canonical stored value
    is_type: Statement<'db>,
    is_accession: Statement<'db>,
    is_genus: Statement<'db>,
    is_species: Statement<'db>,
    is_monomer: Statement<'db>,
}

impl<'db> Catalog<'db> {
    pub fn new(connection: &'db Connection) -> Result<Catalog<'db>> {
        connection.execute_batch(
            "
            create table if not exists Taxon (
                Taxon_Identity integer not null,
                Superkingdom text not null,
                Phylum text not null,
                Class text not null,
                Taxonomic_Order text not null,
                Family text not null,
                Genus text not null,
                Species text not null,
                Strain text not null,
                constraint referenceable_Taxon_Identity primary key (
                    Taxon_Identity
                )
            );
            create table if not exists Sequence (
                Sequence_Identity integer not null,
                Accession text not null,
                Taxon_Identity integer not null,
                constraint Sequence_has_Taxon foreign key (
                    Taxon_Identity
                ) references Taxon(Taxon_Identity),
                constraint referenceable_Sequence_Identity primary key (
                    Sequence_Identity
                )
            );
            create table if not exists Cluster (
                Cluster_Identity integer not null,
                Sequence_Identity integer not null,
                Start_Pos integer not null,
                End_Pos integer not null,
                constraint Cluster_has_Sequence foreign key (
                    Sequence_Identity
                ) references Sequence(Sequence_Identity),
                constraint referenceable_Cluster_Identity primary key (
                    Cluster_Identity
                )
            );
            create table if not exists ClusterType (
                ClusterType_Identity integer not null,
                Term text not null,
                Description text not null,
                constraint referenceable_ClusterType_Identity primary key (
                    ClusterType_Identity
                ),
                constraint unique_Term unique (
                    Term
                )
            );
            create table if not exists Cluster_ClusterType (
                Cluster_Identity integer not null,
                ClusterType_Identity integer not null,
                constraint typed_Cluster foreign key (
                    Cluster_Identity
                ) references Cluster(Cluster_Identity),
                constraint typing_ClusterType foreign key (
                    ClusterType_Identity
                ) references ClusterType(ClusterType_Identity),
                constraint unique_typing primary key (
                    Cluster_Identity,
                    ClusterType_Identity
                )
            );
            create table if not exists Compound (
                Compound_Identity integer not null,
                Cluster_Identity integer not null,
                Name text not null,
                Peptide_Sequence text not null,
                constraint Compound_has_Cluster foreign key (
                    Cluster_Identity
                ) references Cluster(Cluster_Identity),
                constraint referenceable_Compound_Identity primary key (
                    Compound_Identity
                )
            );
            create table if not exists Monomer (
                Monomer_Identity integer not null,
                Name text not null,
                constraint referenceable_Monomer_Identity primary key (
                    Monomer_Identity
                ),
                constraint unique_Name unique (
                    Name
                )
            );
            create table if not exists Cluster_Monomer (
                Cluster_Identity integer not null,
                Monomer_Identity integer not null,
                constraint built_Cluster foreign key (
                    Cluster_Identity
                ) references Cluster(Cluster_Identity),
                constraint building_Monomer foreign key (
                    Monomer_Identity
                ) references Monomer(Monomer_Identity),
                constraint unique_building primary key (
                    Cluster_Identity,
                    Monomer_Identity
                )
            );
            ",
        )?;
        Ok(Catalog {
            db: connection,
            add_taxon: connection.prepare(
                "
                insert into Taxon (
                    Taxon_Identity,
                    Superkingdom,
                    Phylum,
                    Class,
                    Taxonomic_Order,
                    Family,
                    Genus,
                    Species,
                    Strain
                ) values (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
            )?,
            add_sequence: connection.prepare(
                "
                insert into Sequence (
                    Sequence_Identity,
                    Accession,
                    Taxon_Identity
                ) values (?, ?, ?)
            ",
            )?,
            add_cluster: connection.prepare(
                "
                insert into Cluster (
                    Cluster_Identity,
                    Sequence_Identity,
                    Start_Pos,
                    End_Pos
                ) values (?, ?, ?, ?)
            ",
            )?,
            add_cluster_type: connection.prepare(
                "
                insert into ClusterType (
                    ClusterType_Identity,
                    Term,
                    Description
                ) values (?, ?, ?)
            ",
            )?,
            assign_cluster_type: connection.prepare(
                "
                insert or ignore into Cluster_ClusterType (
                    Cluster_Identity,
                    ClusterType_Identity
                ) values (?, ?)
            ",
            )?,
            add_compound: connection.prepare(
                "
                insert into Compound (
                    Compound_Identity,
                    Cluster_Identity,
                    Name,
                    Peptide_Sequence
                ) values (?, ?, ?, ?)
            ",
            )?,
            add_monomer: connection.prepare(
                "
                insert into Monomer (
                    Monomer_Identity,
                    Name
                ) values (?, ?)
            ",
            )?,
            assign_monomer: connection.prepare(
                "
                insert or ignore into Cluster_Monomer (
                    Cluster_Identity,
                    Monomer_Identity
                ) values (?, ?)
            ",
            )?,
            is_type: connection.prepare(
                "
                select Term
                    from ClusterType
                    where Term = ? collate nocase
                    limit 1
            ",
            )?,
            is_accession: connection.prepare(
                "
                select Accession
                    from Sequence
                    where Accession = ? collate nocase
                    limit 1
            ",
            )?,
            is_genus: connection.prepare(
                "
                select Genus
                    from Taxon
                    where Genus = ? collate nocase
                    limit 1
            ",
            )?,
            is_species: connection.prepare(
                "
                select Species
                    from Taxon
                    where Species like ?
                    limit 1
            ",
            )?,
            is_monomer: connection.prepare(
                "
                select Name
                    from Monomer
                    where Name = ? collate nocase
                    limit 1
            ",
            )?,
        })
    }

    // ------------- Loaders -------------
    pub fn add_taxon(&mut self, taxon_id: u64, lineage: &Lineage) -> Result<()> {
        self.add_taxon.execute(params![
            taxon_id,
            lineage.superkingdom,
            lineage.phylum,
            lineage.class,
            lineage.taxonomic_order,
            lineage.family,
            lineage.genus,
            lineage.species,
            lineage.strain,
        ])?;
        Ok(())
    }
    pub fn add_sequence(&mut self, sequence_id: u64, accession: &str, taxon_id: u64) -> Result<()> {
        self.add_sequence
            .execute(params![sequence_id, accession, taxon_id])?;
        Ok(())
    }
    pub fn add_cluster(
        &mut self,
        cluster_id: RecordId,
        sequence_id: u64,
        start_pos: u64,
        end_pos: u64,
    ) -> Result<()> {
        self.add_cluster
            .execute(params![cluster_id, sequence_id, start_pos, end_pos])?;
        Ok(())
    }
    pub fn add_cluster_type(&mut self, type_id: u64, term: &str, description: &str) -> Result<()> {
        self.add_cluster_type
            .execute(params![type_id, term, description])?;
        Ok(())
    }
    pub fn assign_cluster_type(&mut self, cluster_id: RecordId, type_id: u64) -> Result<()> {
        self.assign_cluster_type
            .execute(params![cluster_id, type_id])?;
        Ok(())
    }
    pub fn add_compound(
        &mut self,
        compound_id: u64,
        cluster_id: RecordId,
        name: &str,
        peptide_sequence: &str,
    ) -> Result<()> {
        self.add_compound
            .execute(params![compound_id, cluster_id, name, peptide_sequence])?;
        Ok(())
    }
    pub fn add_monomer(&mut self, monomer_id: u64, name: &str) -> Result<()> {
        self.add_monomer.execute(params![monomer_id, name])?;
        Ok(())
    }
    pub fn assign_monomer(&mut self, cluster_id: RecordId, monomer_id: u64) -> Result<()> {
        self.assign_monomer.execute(params![cluster_id, monomer_id])?;
        Ok(())
    }

    // ------------- Classification probes -------------
    // Each probe answers with the canonical stored value, so that a term
    // matched in a different case ends up in its catalog spelling.
    pub fn canonical_type(&mut self, term: &str) -> Result<Option<String>> {
        Ok(self
            .is_type
            .query_row(params![term], |row| row.get(0))
            .optional()?)
    }
    pub fn canonical_accession(&mut self, term: &str) -> Result<Option<String>> {
        Ok(self
            .is_accession
            .query_row(params![term], |row| row.get(0))
            .optional()?)
    }
    pub fn canonical_genus(&mut self, term: &str) -> Result<Option<String>> {
        Ok(self
            .is_genus
            .query_row(params![term], |row| row.get(0))
            .optional()?)
    }
    // The term has to line up with the start of a word inside the species
    // string, hence the whitespace-prefixed pattern. A word prefix is
    // enough; the match is not anchored to the end of the string.
    pub fn canonical_species(&mut self, term: &str) -> Result<Option<String>> {
        Ok(self
            .is_species
            .query_row(params![format!("% {}%", term)], |row| row.get(0))
            .optional()?)
    }
    pub fn canonical_monomer(&mut self, term: &str) -> Result<Option<String>> {
        Ok(self
            .is_monomer
            .query_row(params![term], |row| row.get(0))
            .optional()?)
    }

    // ------------- Search execution -------------
    /// Run a category lookup and collect the matching cluster identities.
    pub fn clusters_where<P: Params>(&self, sql: &str, search: P) -> Result<RoaringTreemap> {
        let mut found_clusters = RoaringTreemap::new();
        let mut statement = self.db.prepare(sql)?;
        let rows = statement.query_map(search, |row| row.get::<_, RecordId>(0))?;
        for cluster in rows {
            found_clusters.insert(cluster?);
        }
        Ok(found_clusters)
    }

    /// Run a grouped-count query over the given cluster identities. The
    /// template contains an `{ids}` marker that is expanded to a subselect
    /// over a temp table holding the identities. SQLite caps the number of
    /// bound parameters well below a realistic result set, so the identities
    /// are staged rather than bound one by one.
    pub fn grouped_count(&self, template: &str, ids: &RoaringTreemap) -> Result<GroupedCounts> {
        self.db.execute_batch(
            "create temp table if not exists Staged_Cluster (
                Staged_Cluster_Identity integer not null,
                constraint Staged_Cluster_PK primary key (Staged_Cluster_Identity)
             );
             delete from Staged_Cluster;",
        )?;
        {
            let mut stage = self
                .db
                .prepare_cached("insert into Staged_Cluster (Staged_Cluster_Identity) values (?)")?;
            for cluster in ids.iter() {
                stage.execute(params![cluster])?;
            }
        }
        let sql = template.replace("{ids}", "select Staged_Cluster_Identity from Staged_Cluster");
        let mut statement = self.db.prepare(&sql)?;
        let rows = statement.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, u64>(1)?))
        })?;
        let mut counts = GroupedCounts::default();
        for row in rows {
            let (label, count) = row?;
            counts.labels.push(label);
            counts.data.push(count);
        }
        self.db.execute("delete from Staged_Cluster", [])?;
        Ok(counts)
    }

    /// Run a distinct-value prefix query for autocompletion.
    pub fn distinct_terms(&self, sql: &str, prefix: &str) -> Result<Vec<String>> {
        let mut statement = self.db.prepare(sql)?;
        let rows = statement.query_map(params![format!("{}%", prefix)], |row| {
            row.get::<_, String>(0)
        })?;
        let mut terms = Vec::new();
        for term in rows {
            terms.push(term?);
        }
        Ok(terms)
    }
}
