//! Rendering of the generated Python script bodies.
//!
//! The script text is opaque payload for a downstream Hail session; this
//! module only substitutes caller-supplied locations into fixed templates.
//! Nothing here validates that the referenced GCS paths exist.

/// Parameters for the `hl.import_gvs` invocation script.
#[derive(Debug, Clone)]
pub struct ImportScript<'a> {
    /// Serialized Avro argument block, as produced by
    /// [`serialize_avro_args`](crate::serialize::serialize_avro_args).
    pub avro_args: &'a str,
    /// GCS location for the VDS output.
    pub vds_output_path: &'a str,
    /// GCS location for Hail temporary files.
    pub temp_dir: &'a str,
}

impl ImportScript<'_> {
    /// Render the complete import script body.
    pub fn render(&self) -> String {
        // Continuation lines of the argument block line up under the
        // hl.import_gvs( call site.
        let avro_args = indent_continuation_lines(self.avro_args);
        format!(
            r#"
# The following instructions can be used from the terminal of a Terra notebook to import GVS QuickStart Avro files
# and generate a VDS.
#
# Copy the appropriate Hail wheel locally first:
#
# gsutil -m cp 'gs://gvs-internal-scratch/hail-wheels/2022-08-18-01f7b77ebbcc/hail-0.2.97-py3-none-any.whl' .
#
# If running locally (non-Spark cluster) set this in the environment before launching Python:
# export PYSPARK_SUBMIT_ARGS='--driver-memory 16g --executor-memory 16g pyspark-shell'
#
# Hail wants Java 8, Java 11+ will not do. Make sure you have a Java 8 in your path with `java -version`.
#
# pip install --force-reinstall hail-0.2.97-py3-none-any.whl
# gcloud auth application-default login
# curl -sSL https://broad.io/install-gcs-connector | python3

import hail as hl

rg38 = hl.get_reference('GRCh38')
rg38.add_sequence('gs://hail-common/references/Homo_sapiens_assembly38.fasta.gz',
                  'gs://hail-common/references/Homo_sapiens_assembly38.fasta.fai')

hl.import_gvs(
    {avro_args},
    final_path="{vds_output_path}",
    tmp_dir="{temp_dir}",
    reference_genome=rg38,
)
"#,
            avro_args = avro_args,
            vds_output_path = self.vds_output_path,
            temp_dir = self.temp_dir,
        )
    }
}

/// Parameters for the VAT-inputs derivation script.
#[derive(Debug, Clone)]
pub struct VatInputsScript<'a> {
    /// GCS location of the VDS produced by the import script.
    pub vds_output_path: &'a str,
    /// GCS location for a full VCF extracted from the VDS.
    pub vcf_output_path: &'a str,
    /// GCS location for the sites-only VCF.
    pub sites_only_vcf_output_path: &'a str,
    /// GCS location for the VAT custom annotations TSV.
    pub vat_custom_annotations_tsv_path: &'a str,
    /// Path to the tab-separated ancestry file mapping samples to
    /// subpopulations.
    pub ancestry_file_path: &'a str,
}

impl VatInputsScript<'_> {
    /// Render the complete VAT-inputs script body.
    pub fn render(&self) -> String {
        format!(
            r#"
## Get the original VDS
vds = hl.vds.read_vds('{vds_output_path}')

from datetime import datetime
start = datetime.now()
current_time = start.strftime("%H:%M:%S")
print("Start Time =", current_time)

# Now parse the ancestry file to get it ready for the subpopulation work

import csv

sample_id_to_sub_population_map = {{}}
with open('{ancestry_file_path}', 'r') as file:
  reader = csv.reader(file, delimiter='\t')
  next(reader) # skip header
  for row in reader:
    key = row[0]
    value = row[4]
    sample_id_to_sub_population_map[key] = value

## Hard filter out non-passing sites
# note: no AC/AN and AF for filtered out positions
vd = vds.variant_data
filtered_vd = vd.filter_rows(hl.len(vd.filters)==0)
filtered_vds = hl.vds.VariantDataset(vds.reference_data, filtered_vd)

## Replace LGT with GT (for easier calculations later)
filtered_vd = filtered_vds.variant_data
filtered_vd = filtered_vd.annotate_entries(GT=hl.vds.lgt_to_gt(filtered_vd.LGT, filtered_vd.LA))
filtered_vds = hl.vds.VariantDataset(filtered_vds.reference_data, filtered_vd)

## Respect the FT flag by setting all failing GTs to a no call
# filtered_vd.FT is True => GT keeps its current value
# filtered_vd.FT is False => GT assigned no-call
# filtered_vd.FT is missing => GT keeps its current value
filtered_vd = filtered_vd.annotate_entries(GT=hl.or_missing(hl.coalesce(filtered_vd.FT, True), filtered_vd.GT))

## Turn the GQ0s into no calls so that ANs are correct
rd = filtered_vds.reference_data
rd = rd.filter_entries(rd.GQ > 0)
filtered_vds = hl.vds.VariantDataset(rd, filtered_vd)

## Create a dense matrix table to calculate AC, AN, AF
mt = hl.vds.to_dense_mt(filtered_vds)

mt = mt.annotate_cols(pop = hl.literal(sample_id_to_sub_population_map)[mt.s])
mt = mt.select_rows(
    ac_an_af = hl.agg.call_stats(mt.GT, mt.alleles),
    call_stats_by_pop = hl.agg.group_by(mt.pop, hl.agg.call_stats(mt.GT, mt.alleles))
)

qc_data = mt.rows()

## Join the stats back to the VDS
filtered_vd = filtered_vds.variant_data
filtered_vd = filtered_vd.annotate_rows(ac_an_af = qc_data[filtered_vd.row_key])
final_vds = hl.vds.VariantDataset(rd, filtered_vd)

## Create the VAT inputs:

# 1. Create a sites-only VCF
hl.export_vcf(final_vds.variant_data.rows(), '{sites_only_vcf_output_path}')

# 2. Create a VAT TSV file with subpopulation data
hl.export_table(qc_data, '{vat_custom_annotations_tsv_path}')

## The following can be used for extracting a VCF
# mt = hl.vds.to_dense_mt(vds)
# fail_case = 'FAIL'
# mt = mt.annotate_entries(FT=hl.if_else(mt.FT, 'PASS', fail_case))
# hl.export_vcf(mt, '{vcf_output_path}')
"#,
            vds_output_path = self.vds_output_path,
            vcf_output_path = self.vcf_output_path,
            sites_only_vcf_output_path = self.sites_only_vcf_output_path,
            vat_custom_annotations_tsv_path = self.vat_custom_annotations_tsv_path,
            ancestry_file_path = self.ancestry_file_path,
        )
    }
}

/// Indent every line after the first by four spaces so a multi-line block
/// reads as one argument of the surrounding call. Cosmetic only.
fn indent_continuation_lines(block: &str) -> String {
    block.replace('\n', "\n    ")
}
