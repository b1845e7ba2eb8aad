//! Environment-scoped stack: VPC, tiered subnets, routing and subnet groups.

use tracing::{debug, info};
use wimpy_template::{
    values, Expr, Output, Pseudo, Resource, Tags, Template, Value, DEFAULT_FORMAT_VERSION,
};

use crate::config::EnvironmentConfig;
use crate::error::StackResult;
use crate::network::{SubnetTier, ZONE_COUNT};

const DESCRIPTION: &str = "Stack that creates resources for a specific environment";

const INTERNET_CIDR: &str = "0.0.0.0/0";

fn subnet_name(tier: SubnetTier, n: usize) -> String {
    format!("{}Subnet{}", tier.logical_prefix(), n)
}

fn route_table_name(tier: SubnetTier, n: usize) -> String {
    format!("{}RouteTable{}", tier.logical_prefix(), n)
}

fn association_name(tier: SubnetTier, n: usize) -> String {
    format!("{}RouteTableAssociation{}", tier.logical_prefix(), n)
}

fn route_name(tier: SubnetTier, n: usize) -> String {
    format!("{}Route{}", tier.logical_prefix(), n)
}

fn zone_tags(tier: SubnetTier, zone: &str) -> Tags {
    Tags::new().with(
        "Name",
        Expr::join("-", values![Pseudo::StackName, tier.tag(), zone]),
    )
}

fn subnet_refs(tier: SubnetTier) -> Vec<Value> {
    (1..=ZONE_COUNT)
        .map(|n| Expr::reference(subnet_name(tier, n)).into())
        .collect()
}

/// Builds one environment template, tier block by tier block.
struct EnvironmentBuilder<'a> {
    config: &'a EnvironmentConfig,
    template: Template,
}

impl<'a> EnvironmentBuilder<'a> {
    fn zones(&self) -> impl Iterator<Item = (usize, &'a str)> {
        let config = self.config;
        config
            .availability_zones
            .iter()
            .enumerate()
            .map(|(i, zone)| (i + 1, zone.as_str()))
    }

    fn route_tables(&mut self, tier: SubnetTier) -> StackResult<()> {
        for (n, zone) in self.zones() {
            self.template.add_resource(
                Resource::new(route_table_name(tier, n), "AWS::EC2::RouteTable")
                    .with_property("VpcId", Expr::reference("VPC"))
                    .with_tags(zone_tags(tier, zone)),
            )?;
        }
        Ok(())
    }

    fn associations(&mut self, tier: SubnetTier) -> StackResult<()> {
        for (n, _) in self.zones() {
            self.template.add_resource(
                Resource::new(association_name(tier, n), "AWS::EC2::SubnetRouteTableAssociation")
                    .with_property("SubnetId", Expr::reference(subnet_name(tier, n)))
                    .with_property("RouteTableId", Expr::reference(route_table_name(tier, n))),
            )?;
        }
        Ok(())
    }

    fn subnets(&mut self, tier: SubnetTier) -> StackResult<()> {
        let layout = self.config.layout();
        for (n, zone) in self.zones() {
            let cidr = layout.subnet_cidr(tier, n - 1)?;
            debug!("{} subnet in {}: {}", tier, zone, cidr);
            self.template.add_resource(
                Resource::new(subnet_name(tier, n), "AWS::EC2::Subnet")
                    .with_property("VpcId", Expr::reference("VPC"))
                    .with_property("AvailabilityZone", zone)
                    .with_property("CidrBlock", cidr)
                    .with_tags(zone_tags(tier, zone)),
            )?;
        }
        Ok(())
    }

    /// Default routes; the gateway must be attached before a route can use it.
    fn internet_routes(&mut self, tier: SubnetTier) -> StackResult<()> {
        for (n, _) in self.zones() {
            self.template.add_resource(
                Resource::new(route_name(tier, n), "AWS::EC2::Route")
                    .with_property("GatewayId", Expr::reference("InternetGateway"))
                    .with_property("DestinationCidrBlock", INTERNET_CIDR)
                    .with_property("RouteTableId", Expr::reference(route_table_name(tier, n)))
                    .depends_on(["InternetGatewayAttachment"]),
            )?;
        }
        Ok(())
    }

    fn finish(self) -> Template {
        self.template
    }
}

/// Build the network template for the environment described by `config`.
pub fn build_environment_template(config: &EnvironmentConfig) -> StackResult<Template> {
    config.validate()?;

    let mut template = Template::new();
    template.set_version(DEFAULT_FORMAT_VERSION);
    template.set_description(DESCRIPTION);

    let mut builder = EnvironmentBuilder { config, template };

    builder.route_tables(SubnetTier::Elb)?;
    builder.associations(SubnetTier::Elb)?;
    builder.subnets(SubnetTier::Elb)?;
    builder.internet_routes(SubnetTier::Elb)?;

    builder.subnets(SubnetTier::App)?;
    builder.associations(SubnetTier::App)?;
    builder.route_tables(SubnetTier::App)?;
    builder.internet_routes(SubnetTier::App)?;

    builder.subnets(SubnetTier::Db)?;
    builder.route_tables(SubnetTier::Db)?;
    builder.associations(SubnetTier::Db)?;

    let mut t = builder.finish();

    t.add_resource(
        Resource::new("ElastiCacheSubnetGroup", "AWS::ElastiCache::SubnetGroup")
            .with_property("SubnetIds", subnet_refs(SubnetTier::Db))
            .with_property("Description", Pseudo::StackName),
    )?;
    t.add_resource(
        Resource::new("RDSSubnetGroup", "AWS::RDS::DBSubnetGroup")
            .with_property("SubnetIds", subnet_refs(SubnetTier::Db))
            .with_property("DBSubnetGroupDescription", Pseudo::StackName),
    )?;

    t.add_resource(
        Resource::new("VPC", "AWS::EC2::VPC")
            .with_property("InstanceTenancy", "default")
            .with_property("EnableDnsSupport", true)
            .with_property("CidrBlock", config.layout().vpc_cidr())
            .with_property("EnableDnsHostnames", true)
            .with_tags(Tags::new().with("Name", Pseudo::StackName)),
    )?;
    t.add_resource(
        Resource::new("InternetGatewayAttachment", "AWS::EC2::VPCGatewayAttachment")
            .with_property("VpcId", Expr::reference("VPC"))
            .with_property("InternetGatewayId", Expr::reference("InternetGateway")),
    )?;
    t.add_resource(
        Resource::new("InternetGateway", "AWS::EC2::InternetGateway")
            .with_tags(Tags::new().with("Name", Pseudo::StackName)),
    )?;

    t.add_output(Output::new("VPC", Expr::reference("VPC")).with_description("VPC ID"))?;
    for (name, tier, description) in [
        ("ELBSubnets", SubnetTier::Elb, "ELB Subnets"),
        ("AppSubnets", SubnetTier::App, "Application subnets"),
        ("DBSubnets", SubnetTier::Db, "DB Subnets"),
    ] {
        t.add_output(
            Output::new(name, Expr::join(", ", subnet_refs(tier))).with_description(description),
        )?;
    }
    t.add_output(
        Output::new("InternetGateway", Expr::reference("InternetGateway"))
            .with_description("Internet Gateway id"),
    )?;

    info!("Built environment template for index {}", config.index);
    Ok(t)
}
